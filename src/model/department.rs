use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Department {
    pub id: i64,
    pub organization_id: i64,
    #[schema(example = "General")]
    pub name: String,
    #[schema(example = "GEN")]
    pub code: String,
    pub active: bool,
}
