use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "organization_id": 1,
        "device_name": "Main Gate K20",
        "serial_number": "A8N5203960452",
        "ip_address": "192.168.1.198",
        "port": 4370,
        "status": "online",
        "active": true
    })
)]
pub struct Device {
    pub id: i64,
    pub organization_id: i64,
    pub device_name: String,
    pub serial_number: String,
    pub ip_address: Option<String>,
    pub port: i64,
    /// online | offline | error | maintenance
    pub status: String,
    pub active: bool,
}
