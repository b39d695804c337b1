//! Authorization snapshots.
//!
//! The embargoed item has no restricting policies of its own yet, so the
//! decision is made against the rules of its owning collection. The snapshot
//! is read once per embargo application and never refreshed.

use embargo_kernel_core::{Action, AuthorizedGroupSet, ResourceId};
use embargo_kernel_store::AuthorizationSource;

use crate::error::Result;

/// Reads the groups authorized for an action on a container.
pub struct SnapshotReader<'a, A: AuthorizationSource + ?Sized> {
    source: &'a A,
}

impl<'a, A: AuthorizationSource + ?Sized> SnapshotReader<'a, A> {
    pub fn new(source: &'a A) -> Self {
        Self { source }
    }

    /// Snapshot the groups permitted `action` on `container`.
    ///
    /// Lookup failures, including an unknown container, propagate unchanged.
    pub async fn authorized_groups(
        &self,
        container: ResourceId,
        action: Action,
    ) -> Result<AuthorizedGroupSet> {
        let groups = self.source.authorized_groups(container, action).await?;
        tracing::debug!(
            %container,
            %action,
            authorized = groups.len(),
            "read authorization snapshot"
        );
        Ok(groups)
    }
}
