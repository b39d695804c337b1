//! In-memory implementation of the collaborator traits.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use embargo_kernel_core::{
    Action, AuthorizedGroupSet, EffectiveUntil, Group, GroupId, PolicyId, ResourceId,
    ResourcePolicy,
};

use crate::error::{Result, StoreError};
use crate::traits::{self, AuthorizationSource, GroupDirectory, PolicyHandle, PolicyStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Groups indexed by ID.
    groups: BTreeMap<GroupId, Group>,

    /// Name index: group name -> group id.
    names: HashMap<String, GroupId>,

    /// Authorization rules: container -> action -> authorized groups.
    containers: HashMap<ResourceId, HashMap<Action, BTreeSet<GroupId>>>,

    /// Committed policies indexed by ID.
    policies: BTreeMap<PolicyId, ResourcePolicy>,

    /// Key index: (resource, group, action) -> policy id.
    policy_keys: HashMap<(ResourceId, GroupId, Action), PolicyId>,

    next_group_id: i64,
    next_policy_id: i64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                next_policy_id: 1,
                ..Default::default()
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryStoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryStoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a group under the next free id, or return the existing one.
    pub fn define_group(&self, name: &str) -> Group {
        let mut inner = self.write();

        if let Some(id) = inner.names.get(name) {
            return inner.groups[id].clone();
        }

        let id = GroupId(inner.next_group_id);
        inner.next_group_id += 1;
        inner.insert_group(Group {
            id,
            name: name.to_string(),
        })
    }

    /// Register a group with a fixed id.
    pub fn define_group_with_id(&self, id: GroupId, name: &str) -> Result<Group> {
        let mut inner = self.write();

        if inner.names.contains_key(name) || inner.groups.contains_key(&id) {
            return Err(StoreError::GroupExists(name.to_string()));
        }

        inner.next_group_id = inner.next_group_id.max(id.0 + 1);
        Ok(inner.insert_group(Group {
            id,
            name: name.to_string(),
        }))
    }

    /// Make a container known, with no authorization rules yet.
    pub fn register_container(&self, container: ResourceId) {
        self.write().containers.entry(container).or_default();
    }

    /// Authorize a group to perform an action on a container.
    ///
    /// Registers the container if needed.
    pub fn authorize(&self, container: ResourceId, group: GroupId, action: Action) -> Result<()> {
        let mut inner = self.write();

        if !inner.groups.contains_key(&group) {
            return Err(StoreError::GroupNotFound(group));
        }

        inner
            .containers
            .entry(container)
            .or_default()
            .entry(action)
            .or_default()
            .insert(group);
        Ok(())
    }

    /// Number of committed policies across all resources.
    pub fn policy_count(&self) -> usize {
        self.read().policies.len()
    }
}

impl MemoryStoreInner {
    fn insert_group(&mut self, group: Group) -> Group {
        self.names.insert(group.name.clone(), group.id);
        self.groups.insert(group.id, group.clone());
        group
    }

    fn policy_by_key(&self, key: &(ResourceId, GroupId, Action)) -> Option<&ResourcePolicy> {
        self.policy_keys.get(key).and_then(|id| self.policies.get(id))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorizationSource for MemoryStore {
    async fn authorized_groups(
        &self,
        container: ResourceId,
        action: Action,
    ) -> Result<AuthorizedGroupSet> {
        let inner = self.read();

        let rules = inner
            .containers
            .get(&container)
            .ok_or(StoreError::ContainerNotFound(container))?;

        Ok(rules
            .get(&action)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.groups.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl GroupDirectory for MemoryStore {
    async fn find_group_by_name(&self, name: &str) -> Result<Option<Group>> {
        let inner = self.read();
        Ok(inner
            .names
            .get(name)
            .and_then(|id| inner.groups.get(id))
            .cloned())
    }
}

#[async_trait]
impl PolicyStore for MemoryStore {
    async fn create_or_modify_policy(
        &self,
        resource: ResourceId,
        group: GroupId,
        action: Action,
        effective_until: EffectiveUntil,
        reason: &str,
    ) -> Result<Option<PolicyHandle>> {
        let inner = self.read();
        let existing = inner.policy_by_key(&(resource, group, action));
        Ok(traits::stage(
            existing,
            resource,
            group,
            action,
            effective_until,
            reason,
        ))
    }

    async fn commit(&self, handle: PolicyHandle) -> Result<ResourcePolicy> {
        let mut inner = self.write();

        if !inner.groups.contains_key(&handle.group) {
            return Err(StoreError::GroupNotFound(handle.group));
        }

        let key = (handle.resource, handle.group, handle.action);

        // Another commit may have created the key since this handle was staged.
        let id = match handle.existing.or_else(|| inner.policy_keys.get(&key).copied()) {
            Some(id) => id,
            None => {
                let id = PolicyId(inner.next_policy_id);
                inner.next_policy_id += 1;
                id
            }
        };

        let policy = ResourcePolicy {
            id,
            resource: handle.resource,
            group: handle.group,
            action: handle.action,
            start_date: handle.start_date,
            reason: handle.reason,
        };

        inner.policy_keys.insert(key, id);
        inner.policies.insert(id, policy.clone());

        Ok(policy)
    }

    async fn policies_for(&self, resource: ResourceId) -> Result<Vec<ResourcePolicy>> {
        let inner = self.read();
        Ok(inner
            .policies
            .values()
            .filter(|p| p.resource == resource)
            .cloned()
            .collect())
    }
}
