use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::device::{LinkFactory, TerminalAdapter};
use crate::model::device::Device;
use crate::utils::db_utils::{build_update_sql, execute_update};

#[derive(Deserialize, ToSchema)]
pub struct CreateDevice {
    #[schema(example = "Main Gate K20")]
    pub device_name: String,
    #[schema(example = "A8N5203960452")]
    pub serial_number: String,
    #[schema(example = "192.168.1.198", nullable = true)]
    pub ip_address: Option<String>,
    #[schema(example = 4370, nullable = true)]
    pub port: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TestConnection {
    #[schema(example = "192.168.1.198", nullable = true)]
    pub host: Option<String>,
    #[schema(example = 4370, nullable = true)]
    pub port: Option<u16>,
}

/// Registered terminals.
#[utoipa::path(
    get,
    path = "/api/v1/devices",
    responses((status = 200, description = "Device list", body = [Device])),
    tag = "Device",
    security(("bearer_auth" = []))
)]
pub async fn list_devices(pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let devices = sqlx::query_as::<_, Device>("SELECT * FROM devices ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch devices");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(devices))
}

/// Register a terminal.
#[utoipa::path(
    post,
    path = "/api/v1/devices",
    request_body = CreateDevice,
    responses(
        (status = 200, description = "Device registered"),
        (status = 409, description = "Serial number already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Device",
    security(("bearer_auth" = []))
)]
pub async fn create_device(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateDevice>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        ErrorInternalServerError("Database error")
    })?;

    let (org_id, _) = crate::sync::ensure_default_scaffolding(&mut tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to ensure default org/department");
            ErrorInternalServerError("Database error")
        })?;

    let result = sqlx::query(
        r#"
        INSERT INTO devices (organization_id, device_name, serial_number, ip_address, port)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(org_id)
    .bind(&payload.device_name)
    .bind(&payload.serial_number)
    .bind(&payload.ip_address)
    .bind(payload.port.unwrap_or(4370))
    .execute(&mut *tx)
    .await;

    match result {
        Ok(_) => {
            tx.commit().await.map_err(|e| {
                error!(error = %e, "Failed to commit device insert");
                ErrorInternalServerError("Database error")
            })?;
            Ok(HttpResponse::Ok().json(json!({ "message": "Device registered" })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Serial number already registered"
                    })));
                }
            }
            error!(error = %e, "Failed to register device");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Update a registered terminal.
#[utoipa::path(
    put,
    path = "/api/v1/devices/{device_id}",
    params(("device_id" = i64, Path, description = "Device ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Device updated"),
        (status = 404, description = "Device not found")
    ),
    tag = "Device",
    security(("bearer_auth" = []))
)]
pub async fn update_device(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let device_id = path.into_inner();
    let update = build_update_sql("devices", &body, "id", device_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Device not found"));
    }

    Ok(HttpResponse::Ok().body("Device updated"))
}

/// Remove a registered terminal.
#[utoipa::path(
    delete,
    path = "/api/v1/devices/{device_id}",
    params(("device_id" = i64, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Device removed"),
        (status = 404, description = "Device not found")
    ),
    tag = "Device",
    security(("bearer_auth" = []))
)]
pub async fn delete_device(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let device_id = path.into_inner();

    let result = sqlx::query("DELETE FROM devices WHERE id = ?")
        .bind(device_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, device_id, "Failed to delete device");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "Device not found" })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Device removed" })))
}

/// Open a session against a terminal, read its identity and count enrolled
/// users (the devices page's connection console).
#[utoipa::path(
    post,
    path = "/api/v1/devices/test",
    request_body(content = TestConnection, description = "Optional terminal address override"),
    responses(
        (status = 200, description = "Connection succeeded", body = Object, example = json!({
            "connected": true,
            "info": { "firmware": "Ver 6.60", "serial": "A8N5203960452" },
            "users_found": 3
        })),
        (status = 502, description = "Connection failed")
    ),
    tag = "Device",
    security(("bearer_auth" = []))
)]
pub async fn test_device(
    config: web::Data<Config>,
    factory: web::Data<LinkFactory>,
    target: Option<web::Json<TestConnection>>,
) -> actix_web::Result<impl Responder> {
    let target = target.map(|t| t.into_inner()).unwrap_or_default();
    let host = target.host.unwrap_or_else(|| config.device_host.clone());
    let port = target.port.unwrap_or(config.device_port);

    let link = factory.get_ref()(&host, port);
    let mut adapter = TerminalAdapter::new(format!("{}:{}", host, port), link);

    if let Err(e) = adapter.connect().await {
        return Ok(HttpResponse::BadGateway().json(json!({
            "connected": false,
            "message": format!("Failed to connect to device at {}:{}: {}", host, port, e)
        })));
    }

    let info = adapter.get_device_info().await.unwrap_or_default();
    let users_found = adapter.get_users().await.map(|u| u.len()).unwrap_or(0);
    adapter.disconnect().await;

    Ok(HttpResponse::Ok().json(json!({
        "connected": true,
        "info": info,
        "users_found": users_found
    })))
}
