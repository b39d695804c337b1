//! The embargo policy generator.
//!
//! Given the groups authorized on the owning collection, the classified
//! embargo terms and the embargo date, decide which read grants to place on
//! the embargoed resource.
//!
//! ## Rules
//!
//! - No embargo date: nothing to do.
//! - Anonymous authorized: anonymous read is bounded by the embargo date, so
//!   the public regains access when the embargo lifts.
//! - Institution-restricted terms and the institutional group authorized:
//!   institutional read is unbounded, so that population keeps access for the
//!   whole embargo.
//! - Delayed-release terms: the institutional group gets no directive. Any
//!   grant it already holds is left as it is.
//!
//! The two populations are evaluated independently. A reserved group that
//! is missing from the directory is logged as a configuration problem and
//! yields no directive; a directory failure aborts the decision.

use embargo_kernel_core::{
    AuthorizedGroupSet, EffectiveUntil, EmbargoKind, Group, NaiveDate, PolicyDirective,
    ReservedGroupNames, ReservedRole, ResourceId,
};
use embargo_kernel_store::{GroupDirectory, GroupDirectoryExt};

use crate::error::{PolicyError, Result};

/// Decides the read-policy directives for a resource entering embargo.
///
/// Holds no state between calls; every call is a single pass over its
/// inputs.
pub struct EmbargoPolicyGenerator<'a, D: GroupDirectory + ?Sized> {
    directory: &'a D,
    names: &'a ReservedGroupNames,
}

impl<'a, D: GroupDirectory + ?Sized> EmbargoPolicyGenerator<'a, D> {
    pub fn new(directory: &'a D, names: &'a ReservedGroupNames) -> Self {
        Self { directory, names }
    }

    /// Produce the directives for one embargo application.
    ///
    /// # Arguments
    /// - `authorized`: Snapshot of groups with read access on the owning collection.
    /// - `embargo_date`: When the embargo lifts; `None` means no embargo.
    /// - `kind`: Classified terms; required whenever `embargo_date` is set.
    /// - `reason`: Recorded on every directive.
    /// - `resource`: The resource being embargoed.
    ///
    /// # Returns
    /// At most two directives, anonymous first. Fails with `MissingTerms`
    /// when a date arrives without terms, and with `Store` when a group
    /// lookup fails.
    pub async fn generate(
        &self,
        authorized: &AuthorizedGroupSet,
        embargo_date: Option<NaiveDate>,
        kind: Option<EmbargoKind>,
        reason: &str,
        resource: ResourceId,
    ) -> Result<Vec<PolicyDirective>> {
        let Some(embargo_date) = embargo_date else {
            tracing::debug!(%resource, "no embargo date, nothing to apply");
            return Ok(Vec::new());
        };
        let kind = kind.ok_or(PolicyError::MissingTerms { embargo_date })?;

        let mut directives = Vec::with_capacity(2);

        if let Some(anonymous) = self
            .authorized_reserved_group(ReservedRole::Anonymous, authorized)
            .await?
        {
            tracing::info!(
                %resource,
                group = %anonymous.name,
                until = %embargo_date,
                "applying embargo to anonymous read"
            );
            directives.push(PolicyDirective::read(
                resource,
                anonymous,
                EffectiveUntil::Until(embargo_date),
                reason,
            ));
        }

        match kind {
            EmbargoKind::DelayedRelease => {
                tracing::info!(
                    %resource,
                    "embargo does not permit institutional access, no institutional grant"
                );
            }
            EmbargoKind::InstitutionRestricted => {
                if let Some(institutional) = self
                    .authorized_reserved_group(ReservedRole::Institutional, authorized)
                    .await?
                {
                    tracing::info!(
                        %resource,
                        group = %institutional.name,
                        "embargo permits institutional access, granting unbounded read"
                    );
                    directives.push(PolicyDirective::read(
                        resource,
                        institutional,
                        EffectiveUntil::Unbounded,
                        reason,
                    ));
                }
            }
        }

        Ok(directives)
    }

    /// Resolve a reserved group and keep it only if it is in the snapshot.
    async fn authorized_reserved_group(
        &self,
        role: ReservedRole,
        authorized: &AuthorizedGroupSet,
    ) -> Result<Option<Group>> {
        let Some(group) = self.directory.resolve_reserved_group(role, self.names).await? else {
            tracing::warn!(
                %role,
                name = self.names.name_for(role),
                "reserved group is not defined in the group directory, skipping"
            );
            return Ok(None);
        };

        if authorized.contains(group.id) {
            Ok(Some(group))
        } else {
            tracing::info!(
                %role,
                group = %group.name,
                "no read grant for reserved group on owning collection, skipping"
            );
            Ok(None)
        }
    }
}
