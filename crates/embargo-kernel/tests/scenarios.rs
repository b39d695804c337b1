//! End-to-end embargo scenarios.
//!
//! Each scenario seeds a repository with the reserved groups, grants some of
//! them read access on a collection, applies an embargo to an item in that
//! collection, and checks the resulting directives and stored policies.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use embargo_kernel::core::PolicyId;
use embargo_kernel::policy::PolicyError;
use embargo_kernel::store::{
    AuthorizationSource, GroupDirectory, MemoryStore, PolicyHandle, PolicyStore, SqliteStore,
    StoreError,
};
use embargo_kernel::{
    Action, AuthorizedGroupSet, EffectiveUntil, EmbargoConfig, EmbargoError, EmbargoSetter, Group,
    GroupId, NaiveDate, ResourceId, ResourcePolicy,
};

const COLLECTION: ResourceId = ResourceId(10);
const ITEM: ResourceId = ResourceId(11);
const REASON: &str = "Embargoed at depositor request";

const ANONYMOUS: GroupId = GroupId(0);
const UW_USERS: GroupId = GroupId(1);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn embargo_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

/// A memory store with Anonymous (0), UW_Users (1) and Staff (2), where
/// `readers` hold default item read on the collection.
fn memory_repository(readers: &[GroupId]) -> MemoryStore {
    let store = MemoryStore::new();
    store.define_group("Anonymous");
    store.define_group("UW_Users");
    store.define_group("Staff");
    store.register_container(COLLECTION);
    for &group in readers {
        store
            .authorize(COLLECTION, group, Action::DefaultItemRead)
            .unwrap();
    }
    store
}

fn sqlite_repository(store: &SqliteStore, readers: &[GroupId]) {
    store.define_group("Anonymous").unwrap();
    store.define_group("UW_Users").unwrap();
    store.define_group("Staff").unwrap();
    store.register_container(COLLECTION).unwrap();
    for &group in readers {
        store
            .authorize(COLLECTION, group, Action::DefaultItemRead)
            .unwrap();
    }
}

fn grants(policies: &[ResourcePolicy]) -> Vec<(GroupId, Action, EffectiveUntil)> {
    policies
        .iter()
        .map(|p| (p.group, p.action, p.effective_until()))
        .collect()
}

// =============================================================================
// DECISION SCENARIOS
// =============================================================================

#[tokio::test]
async fn scenario_delayed_release_public_collection() -> anyhow::Result<()> {
    init_tracing();
    let setter = EmbargoSetter::new(memory_repository(&[ANONYMOUS]), EmbargoConfig::default());

    let report = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Delay release 6 months"),
            REASON,
        )
        .await?;

    assert_eq!(report.directives.len(), 1);
    assert_eq!(report.directives[0].group.name, "Anonymous");
    assert_eq!(
        grants(&setter.store().policies_for(ITEM).await?),
        vec![(ANONYMOUS, Action::Read, EffectiveUntil::Until(embargo_date()))]
    );
    Ok(())
}

#[tokio::test]
async fn scenario_restricted_to_institution() -> anyhow::Result<()> {
    init_tracing();
    let setter = EmbargoSetter::new(
        memory_repository(&[ANONYMOUS, UW_USERS]),
        EmbargoConfig::default(),
    );

    let report = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await?;

    assert_eq!(report.applied.len(), 2);
    assert_eq!(
        grants(&setter.store().policies_for(ITEM).await?),
        vec![
            (ANONYMOUS, Action::Read, EffectiveUntil::Until(embargo_date())),
            (UW_USERS, Action::Read, EffectiveUntil::Unbounded),
        ]
    );
    assert!(report.applied.iter().all(|p| p.reason.as_deref() == Some(REASON)));
    Ok(())
}

#[tokio::test]
async fn scenario_restricted_without_public_access() -> anyhow::Result<()> {
    init_tracing();
    let setter = EmbargoSetter::new(memory_repository(&[UW_USERS]), EmbargoConfig::default());

    setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await?;

    assert_eq!(
        grants(&setter.store().policies_for(ITEM).await?),
        vec![(UW_USERS, Action::Read, EffectiveUntil::Unbounded)]
    );
    Ok(())
}

#[tokio::test]
async fn scenario_delay_on_private_collection_is_empty() -> anyhow::Result<()> {
    let setter = EmbargoSetter::new(
        memory_repository(&[UW_USERS, GroupId(2)]),
        EmbargoConfig::default(),
    );

    let report = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Delay release 1 year"),
            REASON,
        )
        .await?;

    assert!(report.directives.is_empty());
    assert!(setter.store().policies_for(ITEM).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn scenario_restricted_but_institution_not_reader() -> anyhow::Result<()> {
    init_tracing();
    let setter = EmbargoSetter::new(memory_repository(&[ANONYMOUS]), EmbargoConfig::default());

    let report = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await?;

    assert_eq!(report.directives.len(), 1);
    assert_eq!(report.directives[0].group.id, ANONYMOUS);
    Ok(())
}

#[tokio::test]
async fn scenario_no_embargo_date() -> anyhow::Result<()> {
    let setter = EmbargoSetter::new(
        memory_repository(&[ANONYMOUS, UW_USERS]),
        EmbargoConfig::default(),
    );

    let report = setter
        .generate_policies(ITEM, COLLECTION, None, Some("Restrict to UW"), REASON)
        .await?;

    assert!(report.directives.is_empty());
    assert_eq!(setter.store().policy_count(), 0);
    Ok(())
}

#[tokio::test]
async fn scenario_snapshot_reads_configured_action() -> anyhow::Result<()> {
    // Anonymous may read the collection itself, but not new items in it.
    let store = memory_repository(&[]);
    store.authorize(COLLECTION, ANONYMOUS, Action::Read)?;

    let setter = EmbargoSetter::new(store, EmbargoConfig::default());
    let directives = setter
        .plan_policies(ITEM, COLLECTION, Some(embargo_date()), Some("Delay"), REASON)
        .await?;
    assert!(directives.is_empty());

    let config = EmbargoConfig {
        snapshot_action: Action::Read,
        ..EmbargoConfig::default()
    };
    let store = memory_repository(&[]);
    store.authorize(COLLECTION, ANONYMOUS, Action::Read)?;
    let setter = EmbargoSetter::new(store, config);
    let directives = setter
        .plan_policies(ITEM, COLLECTION, Some(embargo_date()), Some("Delay"), REASON)
        .await?;
    assert_eq!(directives.len(), 1);
    Ok(())
}

// =============================================================================
// IDEMPOTENCE AND UPDATES
// =============================================================================

#[tokio::test]
async fn reapplying_same_embargo_is_idempotent() -> anyhow::Result<()> {
    let setter = EmbargoSetter::new(
        memory_repository(&[ANONYMOUS, UW_USERS]),
        EmbargoConfig::default(),
    );

    let first = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await?;
    let after_first = setter.store().policies_for(ITEM).await?;

    let second = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await?;
    let after_second = setter.store().policies_for(ITEM).await?;

    assert_eq!(first.directives, second.directives);
    assert_eq!(after_first, after_second);
    assert!(second.is_noop());
    assert_eq!(second.unchanged, 2);
    Ok(())
}

#[tokio::test]
async fn new_embargo_date_updates_in_place() -> anyhow::Result<()> {
    let setter = EmbargoSetter::new(memory_repository(&[ANONYMOUS]), EmbargoConfig::default());

    let first = setter
        .generate_policies(ITEM, COLLECTION, Some(embargo_date()), Some("Delay"), REASON)
        .await?;

    let extended = NaiveDate::from_ymd_opt(2027, 6, 30).unwrap();
    let second = setter
        .generate_policies(ITEM, COLLECTION, Some(extended), Some("Delay"), REASON)
        .await?;

    assert_eq!(first.applied[0].id, second.applied[0].id);
    let policies = setter.store().policies_for(ITEM).await?;
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].start_date, Some(extended));
    Ok(())
}

#[tokio::test]
async fn public_read_withheld_until_embargo_lifts() -> anyhow::Result<()> {
    let setter = EmbargoSetter::new(
        memory_repository(&[ANONYMOUS, UW_USERS]),
        EmbargoConfig::default(),
    );

    setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await?;

    let policies = setter.store().policies_for(ITEM).await?;
    let anonymous = policies.iter().find(|p| p.group == ANONYMOUS).unwrap();
    let institutional = policies.iter().find(|p| p.group == UW_USERS).unwrap();

    let during = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let after = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

    assert!(!anonymous.is_active_on(during));
    assert!(anonymous.is_active_on(embargo_date()));
    assert!(anonymous.is_active_on(after));

    assert!(institutional.is_active_on(during));
    assert!(institutional.is_active_on(after));
    Ok(())
}

// =============================================================================
// FAILURES
// Errors propagate unchanged and abort the remaining directives.
// =============================================================================

#[tokio::test]
async fn missing_terms_is_a_contract_violation() {
    let setter = EmbargoSetter::new(memory_repository(&[ANONYMOUS]), EmbargoConfig::default());

    let err = setter
        .generate_policies(ITEM, COLLECTION, Some(embargo_date()), None, REASON)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EmbargoError::Policy(PolicyError::MissingTerms { .. })
    ));
    assert_eq!(setter.store().policy_count(), 0);
}

#[tokio::test]
async fn unknown_collection_propagates() {
    let setter = EmbargoSetter::new(memory_repository(&[ANONYMOUS]), EmbargoConfig::default());

    let err = setter
        .generate_policies(
            ITEM,
            ResourceId(999),
            Some(embargo_date()),
            Some("Delay"),
            REASON,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EmbargoError::Policy(PolicyError::Store(StoreError::ContainerNotFound(ResourceId(
            999
        ))))
    ));
}

/// Store that delegates to memory but fails commits for one group.
struct FailingCommits {
    inner: MemoryStore,
    fail_for: GroupId,
    commits: AtomicUsize,
}

#[async_trait]
impl AuthorizationSource for FailingCommits {
    async fn authorized_groups(
        &self,
        container: ResourceId,
        action: Action,
    ) -> embargo_kernel::store::Result<AuthorizedGroupSet> {
        self.inner.authorized_groups(container, action).await
    }
}

#[async_trait]
impl GroupDirectory for FailingCommits {
    async fn find_group_by_name(
        &self,
        name: &str,
    ) -> embargo_kernel::store::Result<Option<Group>> {
        self.inner.find_group_by_name(name).await
    }
}

#[async_trait]
impl PolicyStore for FailingCommits {
    async fn create_or_modify_policy(
        &self,
        resource: ResourceId,
        group: GroupId,
        action: Action,
        effective_until: EffectiveUntil,
        reason: &str,
    ) -> embargo_kernel::store::Result<Option<PolicyHandle>> {
        self.inner
            .create_or_modify_policy(resource, group, action, effective_until, reason)
            .await
    }

    async fn commit(&self, handle: PolicyHandle) -> embargo_kernel::store::Result<ResourcePolicy> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if handle.group == self.fail_for {
            return Err(StoreError::InvalidData("disk full".to_string()));
        }
        self.inner.commit(handle).await
    }

    async fn policies_for(
        &self,
        resource: ResourceId,
    ) -> embargo_kernel::store::Result<Vec<ResourcePolicy>> {
        self.inner.policies_for(resource).await
    }
}

#[tokio::test]
async fn persistence_failure_aborts_and_propagates() {
    init_tracing();
    let store = FailingCommits {
        inner: memory_repository(&[ANONYMOUS, UW_USERS]),
        fail_for: ANONYMOUS,
        commits: AtomicUsize::new(0),
    };
    let setter = EmbargoSetter::new(store, EmbargoConfig::default());

    let err = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EmbargoError::Store(StoreError::InvalidData(_))));
    // The institutional directive was never attempted.
    assert_eq!(setter.store().commits.load(Ordering::SeqCst), 1);
    assert_eq!(setter.store().inner.policy_count(), 0);
}

#[tokio::test]
async fn failure_after_first_commit_leaves_rollback_to_caller() {
    let store = FailingCommits {
        inner: memory_repository(&[ANONYMOUS, UW_USERS]),
        fail_for: UW_USERS,
        commits: AtomicUsize::new(0),
    };
    let setter = EmbargoSetter::new(store, EmbargoConfig::default());

    let result = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await;

    assert!(result.is_err());
    let policies = setter.store().inner.policies_for(ITEM).await.unwrap();
    assert_eq!(
        grants(&policies),
        vec![(ANONYMOUS, Action::Read, EffectiveUntil::Until(embargo_date()))]
    );
}

// =============================================================================
// SQLITE BACKEND
// =============================================================================

#[tokio::test]
async fn sqlite_restricted_to_institution() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = SqliteStore::open(dir.path().join("repository.db"))?;
    sqlite_repository(&store, &[ANONYMOUS, UW_USERS]);

    let setter = EmbargoSetter::new(store, EmbargoConfig::default());
    let first = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await?;
    assert_eq!(first.applied.len(), 2);
    assert_eq!(first.applied[0].id, PolicyId(1));

    let second = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Restrict to UW"),
            REASON,
        )
        .await?;
    assert!(second.is_noop());

    assert_eq!(
        grants(&setter.store().policies_for(ITEM).await?),
        vec![
            (ANONYMOUS, Action::Read, EffectiveUntil::Until(embargo_date())),
            (UW_USERS, Action::Read, EffectiveUntil::Unbounded),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn sqlite_with_custom_config() -> anyhow::Result<()> {
    let store = SqliteStore::open_memory()?;
    store.define_group("Public")?;
    let campus = store.define_group("Campus_Users")?;
    store.register_container(COLLECTION)?;
    store.authorize(COLLECTION, campus.id, Action::DefaultItemRead)?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("embargo.json");
    std::fs::write(
        &path,
        r#"{
            "reserved_groups": { "anonymous": "Public", "institutional": "Campus_Users" },
            "restriction_marker": "Campus only"
        }"#,
    )?;
    let config = EmbargoConfig::load(&path)?;

    let setter = EmbargoSetter::new(store, config);
    let report = setter
        .generate_policies(
            ITEM,
            COLLECTION,
            Some(embargo_date()),
            Some("Campus only, 2 years"),
            REASON,
        )
        .await?;

    assert_eq!(report.directives.len(), 1);
    assert_eq!(report.directives[0].group, campus);
    assert_eq!(
        report.directives[0].effective_until,
        EffectiveUntil::Unbounded
    );
    Ok(())
}
