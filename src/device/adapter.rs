use tracing::{error, info, warn};

use crate::device::error::DeviceError;
use crate::device::link::{DeviceInfo, DeviceLink, DeviceUser, PunchEvent};

/// Stateful wrapper around one terminal session. Data fetches are bracketed
/// with disable/enable so the terminal does not accept new scans mid-transfer;
/// the re-enable is attempted even when the fetch itself fails.
pub struct TerminalAdapter {
    addr: String,
    link: Box<dyn DeviceLink>,
    connected: bool,
}

impl TerminalAdapter {
    pub fn new(addr: impl Into<String>, link: Box<dyn DeviceLink>) -> Self {
        Self {
            addr: addr.into(),
            link,
            connected: false,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub async fn connect(&mut self) -> Result<(), DeviceError> {
        if self.connected {
            return Ok(());
        }
        info!(addr = %self.addr, "Connecting to terminal");
        match self.link.open().await {
            Ok(()) => {
                self.connected = true;
                info!(addr = %self.addr, "Connected to terminal");
                Ok(())
            }
            Err(e) => {
                error!(addr = %self.addr, error = %e, "Failed to connect to terminal");
                self.connected = false;
                Err(e)
            }
        }
    }

    /// Idempotent; always leaves the adapter disconnected.
    pub async fn disconnect(&mut self) {
        if self.connected {
            self.link.close().await;
            info!(addr = %self.addr, "Disconnected from terminal");
        }
        self.connected = false;
    }

    pub async fn get_users(&mut self) -> Result<Vec<DeviceUser>, DeviceError> {
        if !self.connected {
            return Err(DeviceError::NotConnected);
        }
        self.link.disable().await?;
        let fetched = self.link.users().await;
        self.reenable().await;
        fetched
    }

    pub async fn get_attendance(&mut self) -> Result<Vec<PunchEvent>, DeviceError> {
        if !self.connected {
            return Err(DeviceError::NotConnected);
        }
        self.link.disable().await?;
        let fetched = self.link.attendance().await;
        self.reenable().await;
        fetched
    }

    pub async fn get_device_info(&mut self) -> Result<DeviceInfo, DeviceError> {
        if !self.connected {
            return Err(DeviceError::NotConnected);
        }
        self.link.info().await
    }

    pub async fn set_user(&mut self, user: &DeviceUser) -> Result<(), DeviceError> {
        if !self.connected {
            return Err(DeviceError::NotConnected);
        }
        self.link.disable().await?;
        let outcome = self.link.set_user(user).await;
        self.reenable().await;
        outcome
    }

    pub async fn delete_user(&mut self, uid: i64) -> Result<(), DeviceError> {
        if !self.connected {
            return Err(DeviceError::NotConnected);
        }
        self.link.disable().await?;
        let outcome = self.link.delete_user(uid).await;
        self.reenable().await;
        outcome
    }

    pub async fn clear_attendance(&mut self) -> Result<(), DeviceError> {
        if !self.connected {
            return Err(DeviceError::NotConnected);
        }
        self.link.disable().await?;
        let outcome = self.link.clear_attendance().await;
        self.reenable().await;
        outcome
    }

    async fn reenable(&mut self) {
        if let Err(e) = self.link.enable().await {
            warn!(addr = %self.addr, error = %e, "Failed to re-enable terminal after transfer");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::memory::MemoryLink;

    fn adapter(link: MemoryLink) -> TerminalAdapter {
        TerminalAdapter::new("192.168.1.198:4370", Box::new(link))
    }

    #[actix_web::test]
    async fn connect_failure_leaves_adapter_disconnected() {
        let mut link = MemoryLink::seeded();
        link.fail_open = true;
        let mut adapter = adapter(link);

        let err = adapter.connect().await.unwrap_err();
        assert!(err.is_connectivity());
        assert!(!adapter.is_connected());
        assert!(matches!(
            adapter.get_users().await,
            Err(DeviceError::NotConnected)
        ));
    }

    #[actix_web::test]
    async fn fetch_is_bracketed_by_disable_enable() {
        let link = MemoryLink::seeded();
        let ops = link.ops_handle();
        let mut adapter = adapter(link);
        adapter.connect().await.unwrap();
        let users = adapter.get_users().await.unwrap();
        assert!(!users.is_empty());

        assert_eq!(
            ops.lock().unwrap().as_slice(),
            ["open", "disable", "users", "enable"]
        );
    }

    #[actix_web::test]
    async fn device_is_reenabled_when_fetch_fails() {
        let mut link = MemoryLink::seeded();
        link.fail_attendance = true;
        let ops = link.ops_handle();
        let mut adapter = adapter(link);
        adapter.connect().await.unwrap();

        let err = adapter.get_attendance().await.unwrap_err();
        assert!(!err.is_connectivity());

        assert_eq!(
            ops.lock().unwrap().as_slice(),
            ["open", "disable", "attendance", "enable"]
        );
    }

    #[actix_web::test]
    async fn disconnect_is_idempotent() {
        let mut adapter = adapter(MemoryLink::seeded());
        adapter.connect().await.unwrap();
        adapter.disconnect().await;
        adapter.disconnect().await;
        assert!(!adapter.is_connected());
    }
}
