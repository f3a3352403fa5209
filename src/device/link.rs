use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::device::error::DeviceError;

/// User record as held on the terminal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeviceUser {
    /// Terminal-internal identifier; joined to employees.employee_number as a string
    pub uid: i64,
    pub name: String,
    pub card: Option<i64>,
}

/// One clock event as reported by the terminal.
#[derive(Debug, Clone)]
pub struct PunchEvent {
    pub uid: i64,
    /// Some terminals emit records with no usable timestamp; those are dropped
    pub timestamp: Option<NaiveDateTime>,
    /// Raw vendor punch code; see `sync::classify_punch`
    pub code: i64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct DeviceInfo {
    pub firmware: Option<String>,
    pub serial: Option<String>,
    pub platform: Option<String>,
    pub device_name: Option<String>,
    pub mac: Option<String>,
}

/// The seam in front of the vendor's terminal client. The wire protocol is
/// proprietary and lives entirely behind this trait; a production deployment
/// plugs a vendor-backed implementation in here, the tests and the demo mode
/// use [`crate::device::memory::MemoryLink`].
#[async_trait]
pub trait DeviceLink: Send + Sync {
    async fn open(&mut self) -> Result<(), DeviceError>;
    async fn close(&mut self);

    /// Stop the terminal from accepting scans while data is in transfer.
    async fn disable(&mut self) -> Result<(), DeviceError>;
    async fn enable(&mut self) -> Result<(), DeviceError>;

    async fn users(&mut self) -> Result<Vec<DeviceUser>, DeviceError>;
    async fn attendance(&mut self) -> Result<Vec<PunchEvent>, DeviceError>;
    async fn info(&mut self) -> Result<DeviceInfo, DeviceError>;

    async fn set_user(&mut self, user: &DeviceUser) -> Result<(), DeviceError>;
    async fn delete_user(&mut self, uid: i64) -> Result<(), DeviceError>;
    async fn clear_attendance(&mut self) -> Result<(), DeviceError>;
}
