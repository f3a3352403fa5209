use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

/// Everything the landing page renders in one payload.
#[derive(Serialize, ToSchema)]
pub struct DashboardSummary {
    #[schema(example = 42)]
    pub total_employees: i64,
    #[schema(example = 37)]
    pub present_today: i64,
    #[schema(example = 5)]
    pub absent_today: i64,
    #[schema(example = 3)]
    pub late_arrivals: i64,
    pub recent_punches: Vec<RecentPunch>,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct RecentPunch {
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "7")]
    pub last_name: String,
    #[schema(example = "2026-01-05T08:58:12", value_type = String, format = "date-time")]
    pub punch_time: NaiveDateTime,
    #[schema(example = "in")]
    pub punch_type: String,
}

// Workday starts at 09:00; a later first punch counts as a late arrival.
// Kept as text so it compares cleanly against SQLite's TIME().
const WORKDAY_START: &str = "09:00:00";

/// Headline numbers plus the ten most recent punches.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary)
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
pub async fn dashboard_summary(pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let today = Utc::now().date_naive();

    let total_employees: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE status = 'active'")
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count employees");
                ErrorInternalServerError("Internal Server Error")
            })?;

    let present_today: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT employee_id) FROM attendance_records WHERE DATE(punch_time) = ?",
    )
    .bind(today)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to count present employees");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // Late = first punch of the day after the workday start.
    let late_arrivals: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM (
            SELECT employee_id, MIN(punch_time) AS first_punch
            FROM attendance_records
            WHERE DATE(punch_time) = ?
            GROUP BY employee_id
        )
        WHERE TIME(first_punch) > ?
        "#,
    )
    .bind(today)
    .bind(WORKDAY_START)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to count late arrivals");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let recent_punches = sqlx::query_as::<_, RecentPunch>(
        r#"
        SELECT e.first_name, e.last_name, a.punch_time, a.punch_type
        FROM attendance_records a
        JOIN employees e ON e.id = a.employee_id
        ORDER BY a.punch_time DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch recent punches");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let absent_today = (total_employees - present_today).max(0);

    Ok(HttpResponse::Ok().json(DashboardSummary {
        total_employees,
        present_today,
        absent_today,
        late_arrivals,
        recent_punches,
    }))
}
