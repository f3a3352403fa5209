use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    #[schema(example = "DEFAULT")]
    pub code: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: Option<NaiveDateTime>,
}
