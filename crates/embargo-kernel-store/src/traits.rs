//! Collaborator traits: the abstract interface to the hosting platform.
//!
//! These traits let the embargo engine run against any backend. The
//! implementations in this crate are SQLite (persistent) and in-memory (for
//! tests).

use async_trait::async_trait;
use embargo_kernel_core::{
    Action, AuthorizedGroupSet, EffectiveUntil, Group, GroupId, NaiveDate, PolicyId,
    ReservedGroupNames, ReservedRole, ResourceId, ResourcePolicy,
};

use crate::error::Result;

/// A staged create-or-modify of a resource policy.
///
/// Nothing is durable until the handle is passed to [`PolicyStore::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyHandle {
    /// The policy being modified, or `None` when the commit creates one.
    pub existing: Option<PolicyId>,
    pub resource: ResourceId,
    pub group: GroupId,
    pub action: Action,
    pub start_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

impl PolicyHandle {
    /// Whether committing this handle creates a new policy.
    pub fn is_new(&self) -> bool {
        self.existing.is_none()
    }

    /// Check whether an existing policy already has exactly this content.
    pub fn matches(&self, policy: &ResourcePolicy) -> bool {
        policy.resource == self.resource
            && policy.group == self.group
            && policy.action == self.action
            && policy.start_date == self.start_date
            && policy.reason == self.reason
    }
}

/// Authorization query service.
#[async_trait]
pub trait AuthorizationSource: Send + Sync {
    /// Groups currently authorized to perform `action` on `container`.
    ///
    /// Returns `ContainerNotFound` for a container the backend has never
    /// heard of. A known container with no matching rules yields an empty
    /// set.
    async fn authorized_groups(
        &self,
        container: ResourceId,
        action: Action,
    ) -> Result<AuthorizedGroupSet>;
}

/// Group directory service.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// Find a group by its exact name.
    async fn find_group_by_name(&self, name: &str) -> Result<Option<Group>>;
}

/// Policy persistence service.
///
/// # Design Notes
///
/// - **Create or modify**: A policy is keyed by `(resource, group, action)`.
///   Staging a grant for an existing key modifies that policy in place.
/// - **No-op detection**: When the existing policy already carries the same
///   start date and reason, nothing is staged and `None` is returned.
/// - **Commit**: Staged handles are made durable one at a time; the caller
///   owns any surrounding transaction.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Stage a read grant (or any action) for a group on a resource.
    async fn create_or_modify_policy(
        &self,
        resource: ResourceId,
        group: GroupId,
        action: Action,
        effective_until: EffectiveUntil,
        reason: &str,
    ) -> Result<Option<PolicyHandle>>;

    /// Persist a staged handle, returning the stored policy.
    async fn commit(&self, handle: PolicyHandle) -> Result<ResourcePolicy>;

    /// All policies recorded on a resource, ordered by policy id.
    async fn policies_for(&self, resource: ResourceId) -> Result<Vec<ResourcePolicy>>;
}

/// Everything the embargo engine needs from the hosting platform.
pub trait RepositoryStore: AuthorizationSource + GroupDirectory + PolicyStore {}

impl<T: AuthorizationSource + GroupDirectory + PolicyStore + ?Sized> RepositoryStore for T {}

/// Extension trait for role-based group lookup.
pub trait GroupDirectoryExt: GroupDirectory {
    /// Resolve a reserved group by role through the configured name table.
    ///
    /// `Ok(None)` means the group is not defined in the directory at all,
    /// which is a configuration problem rather than a lookup failure.
    fn resolve_reserved_group(
        &self,
        role: ReservedRole,
        names: &ReservedGroupNames,
    ) -> impl std::future::Future<Output = Result<Option<Group>>> + Send;
}

impl<D: GroupDirectory + ?Sized> GroupDirectoryExt for D {
    async fn resolve_reserved_group(
        &self,
        role: ReservedRole,
        names: &ReservedGroupNames,
    ) -> Result<Option<Group>> {
        self.find_group_by_name(names.name_for(role)).await
    }
}

/// Build a handle for `existing`, or `None` when it already matches.
pub(crate) fn stage(
    existing: Option<&ResourcePolicy>,
    resource: ResourceId,
    group: GroupId,
    action: Action,
    effective_until: EffectiveUntil,
    reason: &str,
) -> Option<PolicyHandle> {
    let handle = PolicyHandle {
        existing: existing.map(|p| p.id),
        resource,
        group,
        action,
        start_date: effective_until.start_date(),
        reason: Some(reason.to_string()),
    };

    match existing {
        Some(policy) if handle.matches(policy) => None,
        _ => Some(handle),
    }
}
