use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportQuery {
    /// Defaults to the first day of the current month
    pub start_date: Option<NaiveDate>,
    /// Defaults to today
    pub end_date: Option<NaiveDate>,
    pub employee_id: Option<i64>,
}

/// One employee-day: earliest punch, latest punch, punch count.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct ReportRow {
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "7")]
    pub employee_number: String,
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "7")]
    pub last_name: String,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub work_date: NaiveDate,
    #[schema(example = "2026-01-05T08:58:12", value_type = String, format = "date-time")]
    pub first_punch: NaiveDateTime,
    #[schema(example = "2026-01-05T17:31:40", value_type = String, format = "date-time")]
    pub last_punch: NaiveDateTime,
    #[schema(example = 2)]
    pub punch_count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    pub rows: Vec<ReportRow>,
}

/// Daily first-in / last-out summary per employee over a date range.
#[utoipa::path(
    get,
    path = "/api/v1/reports/attendance",
    params(
        ("start_date" = Option<String>, Query, description = "Range start (YYYY-MM-DD), default first of month"),
        ("end_date" = Option<String>, Query, description = "Range end (YYYY-MM-DD), default today"),
        ("employee_id" = Option<i64>, Query, description = "Restrict to one employee")
    ),
    responses(
        (status = 200, description = "Attendance report", body = ReportResponse),
        (status = 400, description = "Invalid date range")
    ),
    tag = "Report",
    security(("bearer_auth" = []))
)]
pub async fn attendance_report(
    pool: web::Data<SqlitePool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let today = Utc::now().date_naive();
    let month_start = today.with_day(1).unwrap_or(today);

    let start_date = query.start_date.unwrap_or(month_start);
    let end_date = query.end_date.unwrap_or(today);

    if start_date > end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    let mut sql = String::from(
        r#"
        SELECT a.employee_id, e.employee_number, e.first_name, e.last_name,
               DATE(a.punch_time) AS work_date,
               MIN(a.punch_time) AS first_punch,
               MAX(a.punch_time) AS last_punch,
               COUNT(*) AS punch_count
        FROM attendance_records a
        JOIN employees e ON e.id = a.employee_id
        WHERE DATE(a.punch_time) BETWEEN ? AND ?
        "#,
    );

    if query.employee_id.is_some() {
        sql.push_str(" AND a.employee_id = ?");
    }

    sql.push_str(
        r#"
        GROUP BY a.employee_id, DATE(a.punch_time)
        ORDER BY work_date DESC, e.employee_number
        "#,
    );

    let mut q = sqlx::query_as::<_, ReportRow>(&sql)
        .bind(start_date)
        .bind(end_date);
    if let Some(employee_id) = query.employee_id {
        q = q.bind(employee_id);
    }

    let rows = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to build attendance report");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ReportResponse {
        start_date,
        end_date,
        rows,
    }))
}
