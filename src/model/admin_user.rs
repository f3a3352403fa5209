use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Row as stored, password hash included. Never serialized to clients.
#[derive(FromRow)]
pub struct AdminUserSql {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminUser {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "Default Administrator", nullable = true)]
    pub full_name: Option<String>,
    /// superadmin | admin | viewer
    #[schema(example = "superadmin")]
    pub role: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: Option<NaiveDateTime>,
}
