use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::device::{DeviceError, TerminalAdapter};
use crate::model::attendance_record::PunchType;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("database error during sync: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Pull punch events in addition to the user list.
    pub pull_attendance: bool,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct SyncReport {
    pub users_seen: u32,
    pub employees_created: u32,
    pub employees_updated: u32,
    pub punches_seen: u32,
    pub punches_inserted: u32,
    pub punches_skipped: u32,
}

/// Maps the raw vendor punch code to a punch type. Codes 0 and 4 report as
/// check-in on the K20 terminals we have seen; every other code is treated
/// as check-out. Not confirmed against vendor documentation.
pub fn classify_punch(code: i64) -> PunchType {
    match code {
        0 | 4 => PunchType::In,
        _ => PunchType::Out,
    }
}

/// Reconciles device-reported users (and optionally punches) into the local
/// store. Both UI triggers funnel through here; the whole merge commits as
/// one transaction.
///
/// Connectivity failures abort the sync. A failed data fetch on an otherwise
/// reachable device degrades to an empty result set, so the report simply
/// counts zero.
pub async fn run_device_sync(
    pool: &SqlitePool,
    adapter: &mut TerminalAdapter,
    options: SyncOptions,
) -> Result<SyncReport, SyncError> {
    adapter.connect().await?;

    let users = match adapter.get_users().await {
        Ok(users) => users,
        Err(e) if !e.is_connectivity() => {
            warn!(addr = %adapter.addr(), error = %e, "User fetch failed; continuing with empty set");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let punches = if options.pull_attendance {
        match adapter.get_attendance().await {
            Ok(punches) => punches,
            Err(e) if !e.is_connectivity() => {
                warn!(addr = %adapter.addr(), error = %e, "Attendance fetch failed; continuing with empty set");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        Vec::new()
    };

    adapter.disconnect().await;

    let mut report = SyncReport {
        users_seen: users.len() as u32,
        punches_seen: punches.len() as u32,
        ..SyncReport::default()
    };

    let mut tx = pool.begin().await?;

    let (org_id, dept_id) = ensure_default_scaffolding(&mut tx).await?;

    // uid -> employees.id, built while upserting so punch resolution below
    // never re-queries per event
    let mut employee_by_uid: HashMap<String, i64> = HashMap::new();

    for user in &users {
        let uid_str = user.uid.to_string();

        let existing: Option<(i64, String)> =
            sqlx::query_as("SELECT id, first_name FROM employees WHERE employee_number = ?")
                .bind(&uid_str)
                .fetch_optional(&mut *tx)
                .await?;

        match existing {
            Some((id, first_name)) => {
                if !user.name.is_empty() && first_name != user.name {
                    sqlx::query("UPDATE employees SET first_name = ? WHERE id = ?")
                        .bind(&user.name)
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;
                    report.employees_updated += 1;
                }
                employee_by_uid.insert(uid_str, id);
            }
            None => {
                let first_name = if user.name.is_empty() {
                    "User"
                } else {
                    user.name.as_str()
                };
                let result = sqlx::query(
                    r#"
                    INSERT INTO employees
                        (organization_id, department_id, employee_number,
                         first_name, last_name, status, hire_date)
                    VALUES (?, ?, ?, ?, ?, 'active', ?)
                    "#,
                )
                .bind(org_id)
                .bind(dept_id)
                .bind(&uid_str)
                .bind(first_name)
                .bind(&uid_str) // no surname on the terminal; fall back to the uid
                .bind(Utc::now().date_naive())
                .execute(&mut *tx)
                .await?;

                employee_by_uid.insert(uid_str, result.last_insert_rowid());
                report.employees_created += 1;
            }
        }
    }

    for punch in &punches {
        let Some(&employee_id) = employee_by_uid.get(&punch.uid.to_string()) else {
            report.punches_skipped += 1;
            continue;
        };
        let Some(punch_time) = punch.timestamp else {
            report.punches_skipped += 1;
            continue;
        };

        // (employee_id, punch_time) is the natural key; repeated syncs must
        // not duplicate a punch
        let duplicate: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM attendance_records WHERE employee_id = ? AND punch_time = ?",
        )
        .bind(employee_id)
        .bind(punch_time)
        .fetch_optional(&mut *tx)
        .await?;

        if duplicate.is_some() {
            report.punches_skipped += 1;
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO attendance_records
                (employee_id, device_id, punch_time, punch_type, status)
            VALUES (?, 1, ?, ?, 'valid')
            "#,
        )
        .bind(employee_id)
        .bind(punch_time)
        .bind(classify_punch(punch.code).as_str())
        .execute(&mut *tx)
        .await?;
        report.punches_inserted += 1;
    }

    tx.commit().await?;

    info!(
        users = report.users_seen,
        created = report.employees_created,
        updated = report.employees_updated,
        punches = report.punches_inserted,
        skipped = report.punches_skipped,
        "Device sync finished"
    );

    Ok(report)
}

/// First-run bootstrap: a sync against an empty database materializes the
/// tenant scaffolding ("Default Org" / "General") on its own.
pub(crate) async fn ensure_default_scaffolding(
    tx: &mut Transaction<'_, Sqlite>,
) -> Result<(i64, i64), sqlx::Error> {
    let org_id: Option<i64> = sqlx::query_scalar("SELECT id FROM organizations LIMIT 1")
        .fetch_optional(&mut **tx)
        .await?;
    let org_id = match org_id {
        Some(id) => id,
        None => {
            sqlx::query("INSERT INTO organizations (name, code) VALUES ('Default Org', 'DEFAULT')")
                .execute(&mut **tx)
                .await?
                .last_insert_rowid()
        }
    };

    let dept_id: Option<i64> = sqlx::query_scalar("SELECT id FROM departments LIMIT 1")
        .fetch_optional(&mut **tx)
        .await?;
    let dept_id = match dept_id {
        Some(id) => id,
        None => {
            sqlx::query("INSERT INTO departments (organization_id, name, code) VALUES (?, 'General', 'GEN')")
                .bind(org_id)
                .execute(&mut **tx)
                .await?
                .last_insert_rowid()
        }
    };

    Ok((org_id, dept_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::device::memory::MemoryLink;
    use crate::device::{DeviceUser, PunchEvent};
    use chrono::NaiveDate;

    fn adapter(link: MemoryLink) -> TerminalAdapter {
        TerminalAdapter::new("memory", Box::new(link))
    }

    fn user(uid: i64, name: &str) -> DeviceUser {
        DeviceUser {
            uid,
            name: name.to_string(),
            card: None,
        }
    }

    fn punch(uid: i64, h: u32, m: u32, code: i64) -> PunchEvent {
        PunchEvent {
            uid,
            timestamp: NaiveDate::from_ymd_opt(2026, 1, 5)
                .unwrap()
                .and_hms_opt(h, m, 0),
            code,
        }
    }

    async fn employee_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn punch_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM attendance_records")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn punch_codes_map_to_documented_directions() {
        assert_eq!(classify_punch(0), PunchType::In);
        assert_eq!(classify_punch(4), PunchType::In);
        assert_eq!(classify_punch(1), PunchType::Out);
        assert_eq!(classify_punch(2), PunchType::Out);
    }

    #[actix_web::test]
    async fn first_sync_bootstraps_org_and_department() {
        let pool = test_pool().await;
        let mut adapter = adapter(MemoryLink::seeded());

        run_device_sync(&pool, &mut adapter, SyncOptions::default())
            .await
            .unwrap();

        let (name, code): (String, String) =
            sqlx::query_as("SELECT name, code FROM organizations")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!((name.as_str(), code.as_str()), ("Default Org", "DEFAULT"));

        let (name, code): (String, String) = sqlx::query_as("SELECT name, code FROM departments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!((name.as_str(), code.as_str()), ("General", "GEN"));
    }

    #[actix_web::test]
    async fn sync_is_idempotent() {
        let pool = test_pool().await;

        let opts = SyncOptions {
            pull_attendance: true,
        };

        let mut adapter1 = adapter(MemoryLink::seeded());
        let first = run_device_sync(&pool, &mut adapter1, opts).await.unwrap();
        assert_eq!(first.employees_created, 3);
        assert_eq!(first.punches_inserted, 3);

        let employees_before = employee_count(&pool).await;
        let punches_before = punch_count(&pool).await;

        let mut adapter2 = adapter(MemoryLink::seeded());
        let second = run_device_sync(&pool, &mut adapter2, opts).await.unwrap();
        assert_eq!(second.employees_created, 0);
        assert_eq!(second.employees_updated, 0);
        assert_eq!(second.punches_inserted, 0);
        assert_eq!(second.punches_skipped, 3);

        assert_eq!(employee_count(&pool).await, employees_before);
        assert_eq!(punch_count(&pool).await, punches_before);

        // orgs/departments don't multiply either
        let orgs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orgs, 1);
    }

    #[actix_web::test]
    async fn one_employee_row_per_uid() {
        let pool = test_pool().await;

        let link = MemoryLink::new(vec![user(7, "Alice"), user(7, "Alice")], vec![]);
        let mut adapter = adapter(link);
        run_device_sync(&pool, &mut adapter, SyncOptions::default())
            .await
            .unwrap();

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE employee_number = '7'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[actix_web::test]
    async fn renamed_device_user_updates_first_name_only() {
        let pool = test_pool().await;

        let mut a1 = adapter(MemoryLink::new(vec![user(7, "Alice")], vec![]));
        run_device_sync(&pool, &mut a1, SyncOptions::default())
            .await
            .unwrap();

        let mut a2 = adapter(MemoryLink::new(vec![user(7, "Alicia")], vec![]));
        let report = run_device_sync(&pool, &mut a2, SyncOptions::default())
            .await
            .unwrap();
        assert_eq!(report.employees_updated, 1);
        assert_eq!(report.employees_created, 0);

        let (first, last): (String, String) = sqlx::query_as(
            "SELECT first_name, last_name FROM employees WHERE employee_number = '7'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(first, "Alicia");
        assert_eq!(last, "7");
    }

    #[actix_web::test]
    async fn nameless_device_user_gets_placeholder() {
        let pool = test_pool().await;

        let mut adapter = adapter(MemoryLink::new(vec![user(9, "")], vec![]));
        run_device_sync(&pool, &mut adapter, SyncOptions::default())
            .await
            .unwrap();

        let (first, last): (String, String) = sqlx::query_as(
            "SELECT first_name, last_name FROM employees WHERE employee_number = '9'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(first, "User");
        assert_eq!(last, "9");
    }

    #[actix_web::test]
    async fn punch_with_unknown_uid_is_dropped() {
        let pool = test_pool().await;

        let link = MemoryLink::new(vec![user(7, "Alice")], vec![punch(99, 9, 0, 0)]);
        let mut adapter = adapter(link);
        let report = run_device_sync(
            &pool,
            &mut adapter,
            SyncOptions {
                pull_attendance: true,
            },
        )
        .await
        .unwrap();

        assert_eq!(report.punches_skipped, 1);
        assert_eq!(report.punches_inserted, 0);
        assert_eq!(punch_count(&pool).await, 0);
    }

    #[actix_web::test]
    async fn punch_without_timestamp_is_dropped() {
        let pool = test_pool().await;

        let link = MemoryLink::new(
            vec![user(7, "Alice")],
            vec![PunchEvent {
                uid: 7,
                timestamp: None,
                code: 0,
            }],
        );
        let mut adapter = adapter(link);
        let report = run_device_sync(
            &pool,
            &mut adapter,
            SyncOptions {
                pull_attendance: true,
            },
        )
        .await
        .unwrap();

        assert_eq!(report.punches_skipped, 1);
        assert_eq!(punch_count(&pool).await, 0);
    }

    #[actix_web::test]
    async fn punch_direction_is_stored_from_code() {
        let pool = test_pool().await;

        let link = MemoryLink::new(
            vec![user(7, "Alice")],
            vec![punch(7, 8, 0, 4), punch(7, 17, 0, 1)],
        );
        let mut adapter = adapter(link);
        run_device_sync(
            &pool,
            &mut adapter,
            SyncOptions {
                pull_attendance: true,
            },
        )
        .await
        .unwrap();

        let types: Vec<(String,)> =
            sqlx::query_as("SELECT punch_type FROM attendance_records ORDER BY punch_time")
                .fetch_all(&pool)
                .await
                .unwrap();
        let types: Vec<&str> = types.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(types, vec!["in", "out"]);
    }

    #[actix_web::test]
    async fn failed_user_fetch_degrades_to_empty_sync() {
        let pool = test_pool().await;

        let mut link = MemoryLink::seeded();
        link.fail_users = true;
        let mut adapter = adapter(link);

        let report = run_device_sync(&pool, &mut adapter, SyncOptions::default())
            .await
            .unwrap();
        assert_eq!(report.users_seen, 0);
        assert_eq!(report.employees_created, 0);
        assert_eq!(employee_count(&pool).await, 0);
    }

    #[actix_web::test]
    async fn connect_failure_aborts_the_sync() {
        let pool = test_pool().await;

        let mut link = MemoryLink::seeded();
        link.fail_open = true;
        let mut adapter = adapter(link);

        let err = run_device_sync(&pool, &mut adapter, SyncOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Device(e) if e.is_connectivity()));
        assert_eq!(employee_count(&pool).await, 0);
    }
}
