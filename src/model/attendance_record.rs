use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = 1)]
    pub device_id: i64,
    #[schema(example = "2026-01-05T08:59:30", value_type = String, format = "date-time")]
    pub punch_time: NaiveDateTime,
    /// in | out | break_start | break_end
    #[schema(example = "in")]
    pub punch_type: String,
    /// valid | invalid | duplicate | suspicious
    #[schema(example = "valid")]
    pub status: String,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PunchType {
    In,
    Out,
    BreakStart,
    BreakEnd,
}

impl PunchType {
    pub fn as_str(&self) -> &str {
        match self {
            PunchType::In => "in",
            PunchType::Out => "out",
            PunchType::BreakStart => "break_start",
            PunchType::BreakEnd => "break_end",
        }
    }
}
