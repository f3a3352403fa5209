use std::str::FromStr;

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

pub async fn init_db(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("Failed to connect to database")
}

/// Creates all tables if they don't exist yet. Safe to run on every startup.
pub async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS organizations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(255) NOT NULL,
            code VARCHAR(50) NOT NULL UNIQUE,
            address TEXT,
            phone VARCHAR(20),
            email VARCHAR(100),
            active BOOLEAN NOT NULL DEFAULT 1,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS departments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL,
            name VARCHAR(255) NOT NULL,
            code VARCHAR(50) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT 1,
            FOREIGN KEY(organization_id) REFERENCES organizations(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL,
            department_id INTEGER NOT NULL,
            employee_number VARCHAR(50) NOT NULL UNIQUE,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(100) NOT NULL,
            email VARCHAR(100) UNIQUE,
            status VARCHAR(20) NOT NULL DEFAULT 'active',
            contract_type VARCHAR(20) NOT NULL DEFAULT 'permanent',
            hire_date DATE NOT NULL,
            FOREIGN KEY(organization_id) REFERENCES organizations(id),
            FOREIGN KEY(department_id) REFERENCES departments(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id INTEGER NOT NULL,
            device_id INTEGER NOT NULL,
            punch_time DATETIME NOT NULL,
            punch_type VARCHAR(20) NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'valid',
            FOREIGN KEY(employee_id) REFERENCES employees(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leaves (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id INTEGER NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            leave_type VARCHAR(20) NOT NULL DEFAULT 'vacation',
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            reason VARCHAR(255),
            FOREIGN KEY(employee_id) REFERENCES employees(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS devices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL,
            device_name VARCHAR(100) NOT NULL,
            serial_number VARCHAR(100) NOT NULL UNIQUE,
            ip_address VARCHAR(45),
            port INTEGER NOT NULL DEFAULT 4370,
            status VARCHAR(20) NOT NULL DEFAULT 'offline',
            active BOOLEAN NOT NULL DEFAULT 1,
            FOREIGN KEY(organization_id) REFERENCES organizations(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username VARCHAR(50) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            full_name VARCHAR(100),
            role VARCHAR(20) NOT NULL DEFAULT 'admin',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS refresh_tokens (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            jti VARCHAR(64) NOT NULL,
            revoked BOOLEAN NOT NULL DEFAULT 0,
            expires_at DATETIME NOT NULL,
            FOREIGN KEY(user_id) REFERENCES admin_users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized");
    Ok(())
}

/// Seeds `admin` / `admin123` (stored as a raw sha256 hex digest, the legacy
/// format) when the admin table is empty, so a fresh install is always
/// reachable.
pub async fn ensure_default_admin(pool: &SqlitePool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    let digest = Sha256::digest("admin123".as_bytes());
    let pw_hash = format!("{:x}", digest);

    sqlx::query(
        r#"
        INSERT INTO admin_users (username, password_hash, full_name, role)
        VALUES ('admin', ?, 'Default Administrator', 'superadmin')
        "#,
    )
    .bind(&pw_hash)
    .execute(pool)
    .await?;

    info!("Seeded default admin user");
    Ok(())
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    // One connection, otherwise every checkout would open its own :memory: db
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn default_admin_seeded_once() {
        let pool = test_pool().await;

        ensure_default_admin(&pool).await.unwrap();
        ensure_default_admin(&pool).await.unwrap();

        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT username, role FROM admin_users")
                .fetch_all(&pool)
                .await
                .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "admin");
        assert_eq!(rows[0].1, "superadmin");
    }

    #[actix_web::test]
    async fn default_admin_hash_is_sha256_of_admin123() {
        let pool = test_pool().await;
        ensure_default_admin(&pool).await.unwrap();

        let stored: String =
            sqlx::query_scalar("SELECT password_hash FROM admin_users WHERE username = 'admin'")
                .fetch_one(&pool)
                .await
                .unwrap();

        assert_eq!(
            stored,
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[actix_web::test]
    async fn existing_admins_are_not_overwritten() {
        let pool = test_pool().await;

        sqlx::query("INSERT INTO admin_users (username, password_hash, role) VALUES ('ops', 'x', 'viewer')")
            .execute(&pool)
            .await
            .unwrap();

        ensure_default_admin(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
