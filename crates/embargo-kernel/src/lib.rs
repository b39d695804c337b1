//! # Embargo Kernel
//!
//! Decide which groups keep read access to an item entering embargo, and
//! apply that decision to the repository's resource policies.
//!
//! ## Overview
//!
//! When an item is deposited with an embargo, its read grants are derived
//! from the groups that can read its owning collection and from the
//! depositor's embargo terms:
//!
//! - **Public**: anonymous read waits for the embargo date
//! - **Institution**: when the terms say so, the institutional group reads
//!   immediately and permanently
//!
//! ## Usage
//!
//! ```rust,no_run
//! use embargo_kernel::{EmbargoConfig, EmbargoSetter};
//! use embargo_kernel::core::{NaiveDate, ResourceId};
//! use embargo_kernel::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("repository.db").unwrap();
//!     let setter = EmbargoSetter::new(store, EmbargoConfig::default());
//!
//!     let report = setter
//!         .generate_policies(
//!             ResourceId(2),
//!             ResourceId(1),
//!             NaiveDate::from_ymd_opt(2026, 1, 1),
//!             Some("Restrict to UW"),
//!             "Embargoed at depositor request",
//!         )
//!         .await
//!         .unwrap();
//!
//!     println!("{} policies written", report.applied.len());
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `embargo_kernel::core` - Core types (groups, terms, directives)
//! - `embargo_kernel::store` - Collaborator traits, SQLite and memory backends
//! - `embargo_kernel::policy` - Snapshot reader and policy generator

pub mod config;
pub mod error;
pub mod setter;

// Re-export component crates
pub use embargo_kernel_core as core;
pub use embargo_kernel_policy as policy;
pub use embargo_kernel_store as store;

// Re-export main types for convenience
pub use config::EmbargoConfig;
pub use error::{EmbargoError, Result};
pub use setter::{EmbargoReport, EmbargoSetter};

// Re-export commonly used core types
pub use embargo_kernel_core::{
    Action, AuthorizedGroupSet, EffectiveUntil, EmbargoKind, EmbargoTerms, Group, GroupId,
    NaiveDate, PolicyDirective, ResourceId, ResourcePolicy,
};
