use crate::auth::auth::AuthUser;
use crate::model::leave::{Leave, LeaveType};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    #[schema(example = "vacation")]
    pub leave_type: LeaveType, // enum ensures Swagger dropdown
    #[schema(example = "Family trip", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<Leave>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[schema(example = 123)]
    pub employee_id: Option<i64>,
    /// Filter by leave status
    #[schema(example = "pending")]
    pub status: Option<String>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>, // 1-based
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    I64(i64),
    Str(&'a str),
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leaves",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "status": "pending"
        })),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    // start_date ≤ end_date is only guarded here, not in the schema
    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    let employee_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM employees WHERE id = ?")
        .bind(payload.employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to look up employee for leave");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if employee_exists.is_none() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Unknown employee"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO leaves
            (employee_id, start_date, end_date, leave_type, reason)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.leave_type.as_str())
    .bind(&payload.reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to create leave");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "status": "pending"
    })))
}

/* =========================
Approve leave
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leaves/{leave_id}/approve",
    params(("leave_id" = i64, Path, description = "ID of the leave to approve")),
    responses(
        (status = 200, description = "Leave approved"),
        (status = 400, description = "Leave not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let leave_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE leaves
        SET status = 'approved'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Approve leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave approved"
    })))
}

/* =========================
Reject leave
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leaves/{leave_id}/reject",
    params(("leave_id" = i64, Path, description = "ID of the leave to reject")),
    responses(
        (status = 200, description = "Leave rejected"),
        (status = 400, description = "Leave not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let leave_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE leaves
        SET status = 'rejected'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Reject leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave rejected"
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/leaves/{leave_id}",
    params(("leave_id" = i64, Path, description = "ID of the leave to fetch")),
    responses(
        (status = 200, description = "Leave found", body = Leave),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, Leave>("SELECT * FROM leaves WHERE id = ?")
        .bind(leave_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match leave {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave not found"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    pool: web::Data<SqlitePool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::I64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leaves{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::I64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count leaves");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, start_date, end_date, leave_type, status, reason
        FROM leaves
        {}
        ORDER BY start_date DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Leave>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::I64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let response = LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
