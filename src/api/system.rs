use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde_json::{Map, json};
use sqlx::SqlitePool;
use tracing::error;

use crate::auth::auth::AuthUser;

const TABLES: &[&str] = &[
    "organizations",
    "departments",
    "employees",
    "attendance_records",
    "leaves",
    "devices",
    "admin_users",
];

/// Row counts per table (the settings page's database panel).
#[utoipa::path(
    get,
    path = "/api/v1/system/database",
    responses(
        (status = 200, description = "Per-table row counts", body = Object, example = json!({
            "tables": { "employees": 42, "attendance_records": 1890 }
        }))
    ),
    tag = "System",
    security(("bearer_auth" = []))
)]
pub async fn database_stats(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let mut tables = Map::new();
    for table in TABLES {
        // Table names come from the fixed list above, never from input.
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, table, "Failed to count table rows");
                ErrorInternalServerError("Internal Server Error")
            })?;
        tables.insert(table.to_string(), json!(count));
    }

    Ok(HttpResponse::Ok().json(json!({ "tables": tables })))
}
