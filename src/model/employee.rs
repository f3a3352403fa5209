use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "organization_id": 1,
        "department_id": 1,
        "employee_number": "7",
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@company.com",
        "status": "active",
        "contract_type": "permanent",
        "hire_date": "2024-01-01"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = 1)]
    pub organization_id: i64,

    #[schema(example = 1)]
    pub department_id: i64,

    /// Stringified device uid; the join key between the terminal and this table
    #[schema(example = "7")]
    pub employee_number: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@company.com", nullable = true)]
    pub email: Option<String>,

    /// active | inactive | suspended | terminated
    #[schema(example = "active")]
    pub status: String,

    /// permanent | short_contract | intern
    #[schema(example = "permanent")]
    pub contract_type: String,

    #[schema(
        example = "2024-01-01",
        value_type = String,
        format = "date"
    )]
    pub hire_date: NaiveDate,
}
