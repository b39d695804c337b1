//! SQLite implementation of the collaborator traits.
//!
//! A persistent backend using rusqlite with bundled SQLite. Groups, container
//! authorization rules and resource policies live in three tables; see
//! [`crate::migration`] for the schema.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use embargo_kernel_core::{
    Action, AuthorizedGroupSet, EffectiveUntil, Group, GroupId, PolicyId, ResourceId,
    ResourcePolicy,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{self, AuthorizationSource, GroupDirectory, PolicyHandle, PolicyStore};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&conn)
    }

    /// Execute a blocking operation that needs mutable access.
    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&mut conn)
    }

    /// Register a group under the next free id.
    pub fn define_group(&self, name: &str) -> Result<Group> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO epersongroup (group_id, name)
                 VALUES ((SELECT COALESCE(MAX(group_id) + 1, 0) FROM epersongroup), ?1)
                 ON CONFLICT(name) DO NOTHING",
                params![name],
            )?;
            if inserted == 0 {
                return Err(StoreError::GroupExists(name.to_string()));
            }
            let id: i64 = conn.query_row(
                "SELECT group_id FROM epersongroup WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )?;
            Ok(Group::new(id, name))
        })
    }

    /// Register a group with a fixed id.
    pub fn define_group_with_id(&self, id: GroupId, name: &str) -> Result<Group> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO epersongroup (group_id, name) VALUES (?1, ?2)
                 ON CONFLICT DO NOTHING",
                params![id.0, name],
            )?;
            if inserted == 0 {
                return Err(StoreError::GroupExists(name.to_string()));
            }
            Ok(Group::new(id.0, name))
        })
    }

    /// Make a container known, with no authorization rules yet.
    pub fn register_container(&self, container: ResourceId) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO container (resource_id) VALUES (?1)",
                params![container.0],
            )?;
            Ok(())
        })
    }

    /// Authorize a group to perform an action on a container.
    ///
    /// Registers the container if needed.
    pub fn authorize(&self, container: ResourceId, group: GroupId, action: Action) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if !group_exists(&tx, group)? {
                return Err(StoreError::GroupNotFound(group));
            }
            tx.execute(
                "INSERT OR IGNORE INTO container (resource_id) VALUES (?1)",
                params![container.0],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO container_authorization (resource_id, group_id, action)
                 VALUES (?1, ?2, ?3)",
                params![container.0, group.0, action.as_str()],
            )?;
            tx.commit()?;
            Ok(())
        })
    }
}

fn group_exists(conn: &Connection, group: GroupId) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT group_id FROM epersongroup WHERE group_id = ?1",
            params![group.0],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn policy_by_key(
    conn: &Connection,
    resource: ResourceId,
    group: GroupId,
    action: Action,
) -> Result<Option<ResourcePolicy>> {
    Ok(conn
        .query_row(
            "SELECT policy_id, resource_id, group_id, action, start_date, reason
             FROM resourcepolicy
             WHERE resource_id = ?1 AND group_id = ?2 AND action = ?3",
            params![resource.0, group.0, action.as_str()],
            row_to_policy,
        )
        .optional()?)
}

// Helper to convert a row to ResourcePolicy
fn row_to_policy(row: &rusqlite::Row<'_>) -> rusqlite::Result<ResourcePolicy> {
    let action: String = row.get("action")?;
    let action = action
        .parse::<Action>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(ResourcePolicy {
        id: PolicyId(row.get("policy_id")?),
        resource: ResourceId(row.get("resource_id")?),
        group: GroupId(row.get("group_id")?),
        action,
        start_date: row.get("start_date")?,
        reason: row.get("reason")?,
    })
}

#[async_trait]
impl AuthorizationSource for SqliteStore {
    async fn authorized_groups(
        &self,
        container: ResourceId,
        action: Action,
    ) -> Result<AuthorizedGroupSet> {
        self.with_conn(|conn| {
            let known: Option<i64> = conn
                .query_row(
                    "SELECT resource_id FROM container WHERE resource_id = ?1",
                    params![container.0],
                    |row| row.get(0),
                )
                .optional()?;
            if known.is_none() {
                return Err(StoreError::ContainerNotFound(container));
            }

            let mut stmt = conn.prepare(
                "SELECT g.group_id, g.name
                 FROM container_authorization a
                 JOIN epersongroup g ON g.group_id = a.group_id
                 WHERE a.resource_id = ?1 AND a.action = ?2",
            )?;
            let groups = stmt
                .query_map(params![container.0, action.as_str()], |row| {
                    Ok(Group::new(row.get(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<rusqlite::Result<AuthorizedGroupSet>>()?;
            Ok(groups)
        })
    }
}

#[async_trait]
impl GroupDirectory for SqliteStore {
    async fn find_group_by_name(&self, name: &str) -> Result<Option<Group>> {
        self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT group_id, name FROM epersongroup WHERE name = ?1",
                    params![name],
                    |row| Ok(Group::new(row.get(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?)
        })
    }
}

#[async_trait]
impl PolicyStore for SqliteStore {
    async fn create_or_modify_policy(
        &self,
        resource: ResourceId,
        group: GroupId,
        action: Action,
        effective_until: EffectiveUntil,
        reason: &str,
    ) -> Result<Option<PolicyHandle>> {
        self.with_conn(|conn| {
            let existing = policy_by_key(conn, resource, group, action)?;
            Ok(traits::stage(
                existing.as_ref(),
                resource,
                group,
                action,
                effective_until,
                reason,
            ))
        })
    }

    async fn commit(&self, handle: PolicyHandle) -> Result<ResourcePolicy> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if !group_exists(&tx, handle.group)? {
                return Err(StoreError::GroupNotFound(handle.group));
            }

            // The key is unique, so an upsert keeps the existing policy id.
            tx.execute(
                "INSERT INTO resourcepolicy (resource_id, group_id, action, start_date, reason)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(resource_id, group_id, action)
                 DO UPDATE SET start_date = excluded.start_date, reason = excluded.reason",
                params![
                    handle.resource.0,
                    handle.group.0,
                    handle.action.as_str(),
                    handle.start_date,
                    handle.reason,
                ],
            )?;

            let policy = policy_by_key(&tx, handle.resource, handle.group, handle.action)?
                .ok_or_else(|| {
                    StoreError::InvalidData(format!(
                        "policy for {} on {} vanished after commit",
                        handle.group, handle.resource
                    ))
                })?;

            tx.commit()?;
            Ok(policy)
        })
    }

    async fn policies_for(&self, resource: ResourceId) -> Result<Vec<ResourcePolicy>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT policy_id, resource_id, group_id, action, start_date, reason
                 FROM resourcepolicy
                 WHERE resource_id = ?1
                 ORDER BY policy_id",
            )?;
            let policies = stmt
                .query_map(params![resource.0], row_to_policy)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(policies)
        })
    }
}
