use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Vacation,
    Sick,
    Personal,
    Other,
}

impl LeaveType {
    pub fn as_str(&self) -> &str {
        match self {
            LeaveType::Vacation => "vacation",
            LeaveType::Sick => "sick",
            LeaveType::Personal => "personal",
            LeaveType::Other => "other",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Leave {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    /// vacation | sick | personal | other
    #[schema(example = "vacation")]
    pub leave_type: String,
    /// approved | pending | rejected
    #[schema(example = "pending")]
    pub status: String,
    pub reason: Option<String>,
}
