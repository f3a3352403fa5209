use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::device::error::DeviceError;
use crate::device::link::{DeviceInfo, DeviceLink, DeviceUser, PunchEvent};

/// In-memory stand-in for the vendor terminal client. Backs the demo mode and
/// the tests; real deployments implement [`DeviceLink`] over the vendor SDK.
pub struct MemoryLink {
    pub users: Vec<DeviceUser>,
    pub punches: Vec<PunchEvent>,
    pub info: DeviceInfo,

    pub fail_open: bool,
    pub fail_users: bool,
    pub fail_attendance: bool,

    open: bool,
    ops: Arc<Mutex<Vec<&'static str>>>,
}

impl MemoryLink {
    pub fn new(users: Vec<DeviceUser>, punches: Vec<PunchEvent>) -> Self {
        Self {
            users,
            punches,
            info: DeviceInfo::default(),
            fail_open: false,
            fail_users: false,
            fail_attendance: false,
            open: false,
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fixture terminal with a handful of enrolled users and punches.
    pub fn seeded() -> Self {
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let users = vec![
            DeviceUser {
                uid: 7,
                name: "Alice".to_string(),
                card: Some(1001),
            },
            DeviceUser {
                uid: 8,
                name: "Bob".to_string(),
                card: None,
            },
            DeviceUser {
                uid: 9,
                name: String::new(),
                card: None,
            },
        ];
        let punches = vec![
            PunchEvent {
                uid: 7,
                timestamp: day.and_hms_opt(8, 58, 12),
                code: 0,
            },
            PunchEvent {
                uid: 7,
                timestamp: day.and_hms_opt(17, 3, 44),
                code: 1,
            },
            PunchEvent {
                uid: 8,
                timestamp: day.and_hms_opt(9, 12, 5),
                code: 4,
            },
        ];
        let mut link = Self::new(users, punches);
        link.info = DeviceInfo {
            firmware: Some("Ver 6.60".to_string()),
            serial: Some("A8N5203960452".to_string()),
            platform: Some("ZMM220_TFT".to_string()),
            device_name: Some("K20".to_string()),
            mac: Some("00:17:61:c8:ec:17".to_string()),
        };
        link
    }

    /// Handle onto the recorded call sequence, for bracket-order assertions.
    pub fn ops_handle(&self) -> Arc<Mutex<Vec<&'static str>>> {
        Arc::clone(&self.ops)
    }

    fn record(&self, op: &'static str) {
        self.ops.lock().unwrap().push(op);
    }

    fn require_open(&self) -> Result<(), DeviceError> {
        if self.open {
            Ok(())
        } else {
            Err(DeviceError::NotConnected)
        }
    }
}

#[async_trait]
impl DeviceLink for MemoryLink {
    async fn open(&mut self) -> Result<(), DeviceError> {
        self.record("open");
        if self.fail_open {
            return Err(DeviceError::Connect {
                addr: "memory".to_string(),
                reason: "simulated connect failure".to_string(),
            });
        }
        self.open = true;
        Ok(())
    }

    async fn close(&mut self) {
        self.record("close");
        self.open = false;
    }

    async fn disable(&mut self) -> Result<(), DeviceError> {
        self.record("disable");
        self.require_open()
    }

    async fn enable(&mut self) -> Result<(), DeviceError> {
        self.record("enable");
        self.require_open()
    }

    async fn users(&mut self) -> Result<Vec<DeviceUser>, DeviceError> {
        self.record("users");
        self.require_open()?;
        if self.fail_users {
            return Err(DeviceError::Protocol(
                "simulated user fetch failure".to_string(),
            ));
        }
        Ok(self.users.clone())
    }

    async fn attendance(&mut self) -> Result<Vec<PunchEvent>, DeviceError> {
        self.record("attendance");
        self.require_open()?;
        if self.fail_attendance {
            return Err(DeviceError::Protocol(
                "simulated attendance fetch failure".to_string(),
            ));
        }
        Ok(self.punches.clone())
    }

    async fn info(&mut self) -> Result<DeviceInfo, DeviceError> {
        self.record("info");
        self.require_open()?;
        Ok(self.info.clone())
    }

    async fn set_user(&mut self, user: &DeviceUser) -> Result<(), DeviceError> {
        self.record("set_user");
        self.require_open()?;
        match self.users.iter_mut().find(|u| u.uid == user.uid) {
            Some(existing) => *existing = user.clone(),
            None => self.users.push(user.clone()),
        }
        Ok(())
    }

    async fn delete_user(&mut self, uid: i64) -> Result<(), DeviceError> {
        self.record("delete_user");
        self.require_open()?;
        self.users.retain(|u| u.uid != uid);
        Ok(())
    }

    async fn clear_attendance(&mut self) -> Result<(), DeviceError> {
        self.record("clear_attendance");
        self.require_open()?;
        self.punches.clear();
        Ok(())
    }
}
