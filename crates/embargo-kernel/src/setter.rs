//! The EmbargoSetter: decide and apply read policies for an embargoed item.
//!
//! The setter ties the pieces together for the embargo workflow: it
//! classifies the depositor's terms, snapshots the owning collection's
//! authorization once, runs the generator, and pushes each directive
//! through the policy store.

use std::sync::Arc;

use embargo_kernel_core::{EmbargoTerms, NaiveDate, PolicyDirective, ResourceId, ResourcePolicy};
use embargo_kernel_policy::{EmbargoPolicyGenerator, SnapshotReader};
use embargo_kernel_store::RepositoryStore;

use crate::config::EmbargoConfig;
use crate::error::Result;

/// Applies embargo read policies against a repository store.
pub struct EmbargoSetter<S: RepositoryStore> {
    /// The hosting platform's services.
    store: Arc<S>,
    /// Configuration.
    config: EmbargoConfig,
}

impl<S: RepositoryStore> EmbargoSetter<S> {
    /// Create a new setter.
    pub fn new(store: S, config: EmbargoConfig) -> Self {
        Self::with_shared_store(Arc::new(store), config)
    }

    /// Create a setter over a store that is shared with other components.
    pub fn with_shared_store(store: Arc<S>, config: EmbargoConfig) -> Self {
        Self { store, config }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EmbargoConfig {
        &self.config
    }

    /// Classify a raw terms string with the configured marker.
    pub fn parse_terms(&self, raw: &str) -> EmbargoTerms {
        EmbargoTerms::parse_with_marker(raw, &self.config.restriction_marker)
    }

    /// Decide the directives for an item without persisting anything.
    ///
    /// Reads the owning collection's authorization exactly once, and not at
    /// all when there is no embargo date.
    pub async fn plan_policies(
        &self,
        item: ResourceId,
        owning_collection: ResourceId,
        embargo_date: Option<NaiveDate>,
        terms: Option<&str>,
        reason: &str,
    ) -> Result<Vec<PolicyDirective>> {
        if embargo_date.is_none() {
            tracing::debug!(%item, "no embargo date, skipping embargo application");
            return Ok(Vec::new());
        }

        let kind = terms.map(|raw| self.parse_terms(raw).kind());

        let authorized = SnapshotReader::new(self.store.as_ref())
            .authorized_groups(owning_collection, self.config.snapshot_action)
            .await?;

        let generator =
            EmbargoPolicyGenerator::new(self.store.as_ref(), &self.config.reserved_groups);
        Ok(generator
            .generate(&authorized, embargo_date, kind, reason, item)
            .await?)
    }

    /// Decide and persist the directives for an item.
    ///
    /// Each directive is staged with create-or-modify and committed before
    /// the next one is staged. The first failure aborts the rest and is
    /// returned; directives already committed stay committed, and rolling
    /// them back is the caller's transaction's job.
    pub async fn generate_policies(
        &self,
        item: ResourceId,
        owning_collection: ResourceId,
        embargo_date: Option<NaiveDate>,
        terms: Option<&str>,
        reason: &str,
    ) -> Result<EmbargoReport> {
        let directives = self
            .plan_policies(item, owning_collection, embargo_date, terms, reason)
            .await?;
        self.apply_directives(directives).await
    }

    /// Persist already-decided directives.
    pub async fn apply_directives(&self, directives: Vec<PolicyDirective>) -> Result<EmbargoReport> {
        let mut report = EmbargoReport::default();

        for directive in &directives {
            let staged = self
                .store
                .create_or_modify_policy(
                    directive.resource,
                    directive.group.id,
                    directive.action,
                    directive.effective_until,
                    &directive.reason,
                )
                .await?;

            match staged {
                Some(handle) => {
                    let policy = self.store.commit(handle).await?;
                    tracing::info!(
                        policy = %policy.id,
                        %directive,
                        "committed embargo policy"
                    );
                    report.applied.push(policy);
                }
                None => {
                    tracing::debug!(%directive, "existing policy already matches");
                    report.unchanged += 1;
                }
            }
        }

        report.directives = directives;
        Ok(report)
    }
}

/// Outcome of applying an embargo to one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbargoReport {
    /// Directives the generator decided on, in application order.
    pub directives: Vec<PolicyDirective>,
    /// Policies created or modified.
    pub applied: Vec<ResourcePolicy>,
    /// Directives whose policy already matched.
    pub unchanged: usize,
}

impl EmbargoReport {
    /// Whether the store was left untouched.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}
