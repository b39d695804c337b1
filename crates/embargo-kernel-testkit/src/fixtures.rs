//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use embargo_kernel::{EmbargoConfig, EmbargoSetter};
use embargo_kernel_core::{Action, Group, ResourceId};
use embargo_kernel_store::{MemoryStore, StoreError};

/// A memory-backed repository with the reserved groups and one collection.
pub struct RepositoryFixture {
    pub store: Arc<MemoryStore>,
    pub anonymous: Group,
    pub institutional: Group,
    pub collection: ResourceId,
    config: EmbargoConfig,
}

impl RepositoryFixture {
    /// Create a fixture using the default reserved group names.
    pub fn new() -> Self {
        Self::with_config(EmbargoConfig::default())
    }

    /// Create a fixture whose reserved groups follow `config`.
    pub fn with_config(config: EmbargoConfig) -> Self {
        let store = MemoryStore::new();
        let anonymous = store.define_group(&config.reserved_groups.anonymous);
        let institutional = store.define_group(&config.reserved_groups.institutional);
        let collection = ResourceId(1);
        store.register_container(collection);

        Self {
            store: Arc::new(store),
            anonymous,
            institutional,
            collection,
            config,
        }
    }

    /// Define an ordinary group with no reserved meaning.
    pub fn group(&self, name: &str) -> Group {
        self.store.define_group(name)
    }

    /// Grant `group` the snapshotted action on the collection.
    pub fn grant(&self, group: &Group) -> Result<(), StoreError> {
        self.store
            .authorize(self.collection, group.id, self.config.snapshot_action)
    }

    /// Grant `group` some action other than the snapshotted one.
    pub fn grant_action(&self, group: &Group, action: Action) -> Result<(), StoreError> {
        self.store.authorize(self.collection, group.id, action)
    }

    /// An item id inside the collection.
    pub fn item(&self, n: i64) -> ResourceId {
        ResourceId(self.collection.0 + n)
    }

    /// A setter sharing this fixture's store.
    pub fn setter(&self) -> EmbargoSetter<MemoryStore> {
        EmbargoSetter::with_shared_store(Arc::clone(&self.store), self.config.clone())
    }
}

impl Default for RepositoryFixture {
    fn default() -> Self {
        Self::new()
    }
}
