use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::device::{LinkFactory, TerminalAdapter};
use crate::sync::{SyncError, SyncOptions, run_device_sync};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SyncTarget {
    /// Terminal address; defaults to the configured device host
    #[schema(example = "192.168.1.198", nullable = true)]
    pub host: Option<String>,
    #[schema(example = 4370, nullable = true)]
    pub port: Option<u16>,
}

fn build_adapter(
    target: &SyncTarget,
    config: &Config,
    factory: &LinkFactory,
) -> TerminalAdapter {
    let host = target.host.clone().unwrap_or_else(|| config.device_host.clone());
    let port = target.port.unwrap_or(config.device_port);
    let link = factory(&host, port);
    TerminalAdapter::new(format!("{}:{}", host, port), link)
}

async fn run_and_respond(
    pool: &SqlitePool,
    mut adapter: TerminalAdapter,
    options: SyncOptions,
) -> HttpResponse {
    let addr = adapter.addr().to_string();
    match run_device_sync(pool, &mut adapter, options).await {
        Ok(report) => HttpResponse::Ok().json(json!({
            "message": "Sync finished",
            "report": report
        })),
        Err(SyncError::Device(e)) if e.is_connectivity() => {
            error!(addr = %addr, error = %e, "Device unreachable during sync");
            HttpResponse::BadGateway().json(json!({
                "message": format!("Failed to connect to device at {}", addr)
            }))
        }
        Err(e) => {
            error!(addr = %addr, error = %e, "Sync failed");
            HttpResponse::InternalServerError().json(json!({
                "message": "Sync failed, see server logs"
            }))
        }
    }
}

/// Pull the user list from the terminal and reconcile it into the employee
/// table (the employees page's "Sync from Device" button).
#[utoipa::path(
    post,
    path = "/api/v1/sync/employees",
    request_body(content = SyncTarget, description = "Optional terminal address override"),
    responses(
        (status = 200, description = "Sync finished", body = Object, example = json!({
            "message": "Sync finished",
            "report": {
                "users_seen": 3, "employees_created": 2, "employees_updated": 1,
                "punches_seen": 0, "punches_inserted": 0, "punches_skipped": 0
            }
        })),
        (status = 502, description = "Device unreachable"),
        (status = 500, description = "Sync failed")
    ),
    tag = "Sync",
    security(("bearer_auth" = []))
)]
pub async fn sync_employees(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    factory: web::Data<LinkFactory>,
    target: Option<web::Json<SyncTarget>>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let target = target.map(|t| t.into_inner()).unwrap_or_default();
    let adapter = build_adapter(&target, &config, &factory);
    Ok(run_and_respond(
        pool.get_ref(),
        adapter,
        SyncOptions {
            pull_attendance: false,
        },
    )
    .await)
}

/// Pull users and punch events (the attendance page's "Refresh Records").
#[utoipa::path(
    post,
    path = "/api/v1/sync/attendance",
    request_body(content = SyncTarget, description = "Optional terminal address override"),
    responses(
        (status = 200, description = "Sync finished", body = Object),
        (status = 502, description = "Device unreachable"),
        (status = 500, description = "Sync failed")
    ),
    tag = "Sync",
    security(("bearer_auth" = []))
)]
pub async fn sync_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    factory: web::Data<LinkFactory>,
    target: Option<web::Json<SyncTarget>>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let target = target.map(|t| t.into_inner()).unwrap_or_default();
    let adapter = build_adapter(&target, &config, &factory);
    Ok(run_and_respond(
        pool.get_ref(),
        adapter,
        SyncOptions {
            pull_attendance: true,
        },
    )
    .await)
}
