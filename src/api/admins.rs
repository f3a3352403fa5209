use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::model::admin_user::AdminUser;
use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct CreateAdmin {
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "s3cret!pass")]
    pub password: String,
    #[schema(example = "admin")]
    pub role: String,
}

/// Admin accounts, password hashes excluded.
#[utoipa::path(
    get,
    path = "/api/v1/admins",
    responses((status = 200, description = "Admin list", body = [AdminUser])),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
pub async fn list_admins(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let admins = sqlx::query_as::<_, AdminUser>(
        "SELECT id, username, full_name, role, created_at FROM admin_users ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch admin users");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(admins))
}

/// Create an admin account. New passwords are stored as Argon2 hashes.
#[utoipa::path(
    post,
    path = "/api/v1/admins",
    request_body = CreateAdmin,
    responses(
        (status = 200, description = "Admin created"),
        (status = 400, description = "Invalid role"),
        (status = 409, description = "Username already taken"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
pub async fn create_admin(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateAdmin>,
) -> actix_web::Result<impl Responder> {
    auth.require_superadmin()?;

    let Some(role) = Role::from_name(&payload.role) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Invalid role, expected one of: superadmin, admin, viewer"
        })));
    };

    if payload.username.trim().is_empty() || payload.password.len() < 6 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Username must be non-empty and password at least 6 characters"
        })));
    }

    let password_hash = hash_password(&payload.password);

    let result = sqlx::query(
        "INSERT INTO admin_users (username, password_hash, role) VALUES (?, ?, ?)",
    )
    .bind(payload.username.trim())
    .bind(&password_hash)
    .bind(role.to_string())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "message": "Admin created" }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Username already taken"
                    })));
                }
            }
            error!(error = %e, "Failed to create admin");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Delete an admin account. The seeded `admin` account cannot be removed.
#[utoipa::path(
    delete,
    path = "/api/v1/admins/{admin_id}",
    params(("admin_id" = i64, Path, description = "Admin user ID")),
    responses(
        (status = 200, description = "Admin deleted"),
        (status = 400, description = "Cannot delete the built-in admin"),
        (status = 404, description = "Admin not found"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
pub async fn delete_admin(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_superadmin()?;

    let admin_id = path.into_inner();

    let username: Option<String> =
        sqlx::query_scalar("SELECT username FROM admin_users WHERE id = ?")
            .bind(admin_id)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, admin_id, "Failed to look up admin");
                ErrorInternalServerError("Internal Server Error")
            })?;

    let Some(username) = username else {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "Admin not found" })));
    };

    if username == "admin" {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Cannot delete the built-in admin"
        })));
    }

    sqlx::query("DELETE FROM admin_users WHERE id = ?")
        .bind(admin_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, admin_id, "Failed to delete admin");
            ErrorInternalServerError("Internal Server Error")
        })?;

    // Revoke any refresh tokens the deleted account still holds.
    if let Err(e) = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(admin_id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, admin_id, "Failed to purge refresh tokens");
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Admin deleted" })))
}
