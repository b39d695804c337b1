//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 2;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current, CURRENT_VERSION
        )));
    }

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
            tracing::debug!(version, "applied schema migration");
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        2 => apply_v2(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: groups and container authorization rules.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Access-control groups
        CREATE TABLE epersongroup (
            group_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        -- Containers (collections) that carry authorization rules
        CREATE TABLE container (
            resource_id INTEGER PRIMARY KEY
        );

        -- Which groups may perform which action on a container
        CREATE TABLE container_authorization (
            resource_id INTEGER NOT NULL REFERENCES container(resource_id),
            group_id INTEGER NOT NULL REFERENCES epersongroup(group_id),
            action TEXT NOT NULL,             -- Action::as_str()
            PRIMARY KEY (resource_id, group_id, action)
        );
        "#,
    )?;
    Ok(())
}

/// Migration v2: resource policies.
fn apply_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Grants on individual resources, unique per (resource, group, action)
        CREATE TABLE resourcepolicy (
            policy_id INTEGER PRIMARY KEY AUTOINCREMENT,
            resource_id INTEGER NOT NULL,
            group_id INTEGER NOT NULL REFERENCES epersongroup(group_id),
            action TEXT NOT NULL,
            start_date TEXT,                  -- YYYY-MM-DD, not readable before; NULL = immediate
            reason TEXT,
            UNIQUE (resource_id, group_id, action)
        );

        CREATE INDEX idx_resourcepolicy_resource ON resourcepolicy(resource_id);
        "#,
    )?;
    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
