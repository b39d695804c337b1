//! # Embargo Kernel Store
//!
//! The collaborator interfaces the embargo engine consumes, with SQLite and
//! in-memory implementations.
//!
//! ## Overview
//!
//! The hosting repository platform owns authorization rules, groups and
//! resource policies. This crate describes the three services the embargo
//! engine needs from it as traits, so the engine stays storage-agnostic:
//!
//! - [`AuthorizationSource`] - Which groups may perform an action on a container
//! - [`GroupDirectory`] - Group lookup by name
//! - [`PolicyStore`] - Create-or-modify and commit of resource policies
//! - [`RepositoryStore`] - All three together
//!
//! [`SqliteStore`] is a persistent backend and [`MemoryStore`] is for tests.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use embargo_kernel_store::{GroupDirectoryExt, MemoryStore};
//! use embargo_kernel_core::{ReservedGroupNames, ReservedRole};
//!
//! async fn example() {
//!     let store = MemoryStore::new();
//!     store.define_group("Anonymous");
//!
//!     let names = ReservedGroupNames::default();
//!     let anonymous = store
//!         .resolve_reserved_group(ReservedRole::Anonymous, &names)
//!         .await
//!         .unwrap();
//!     assert!(anonymous.is_some());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent by key**: A policy is unique per `(resource, group, action)`;
//!   re-applying an identical grant stages nothing
//! - **Two-phase writes**: `create_or_modify_policy` stages, `commit` persists
//! - **Absence is not failure**: Unknown group names resolve to `None`; unknown
//!   containers are errors

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{
    AuthorizationSource, GroupDirectory, GroupDirectoryExt, PolicyHandle, PolicyStore,
    RepositoryStore,
};
