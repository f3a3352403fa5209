use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Restrict to punches on this calendar date
    pub date: Option<NaiveDate>,
    pub employee_id: Option<i64>,
}

/// Punch row joined with the employee it resolved to.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRow {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "7")]
    pub employee_number: String,
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "7")]
    pub last_name: String,
    #[schema(example = "2026-01-05T08:58:12", value_type = String, format = "date-time")]
    pub punch_time: NaiveDateTime,
    #[schema(example = "in")]
    pub punch_type: String,
    #[schema(example = "valid")]
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRow>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

enum FilterValue {
    I64(i64),
    Date(NaiveDate),
}

/// Attendance records, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("date" = Option<String>, Query, description = "Filter by date (YYYY-MM-DD)"),
        ("employee_id" = Option<i64>, Query, description = "Filter by employee")
    ),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn list_attendance(
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(date) = query.date {
        where_sql.push_str(" AND DATE(a.punch_time) = ?");
        args.push(FilterValue::Date(date));
    }

    if let Some(employee_id) = query.employee_id {
        where_sql.push_str(" AND a.employee_id = ?");
        args.push(FilterValue::I64(employee_id));
    }

    let count_sql = format!(
        "SELECT COUNT(*) FROM attendance_records a{}",
        where_sql
    );

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::I64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count attendance records");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT a.id, a.employee_id, e.employee_number, e.first_name, e.last_name,
               a.punch_time, a.punch_type, a.status
        FROM attendance_records a
        JOIN employees e ON e.id = a.employee_id
        {}
        ORDER BY a.punch_time DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceRow>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::I64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let records = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch attendance list");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: records,
        page,
        per_page,
        total,
    }))
}
