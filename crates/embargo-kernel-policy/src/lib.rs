//! # Embargo Kernel Policy
//!
//! The embargo decision engine and the authorization snapshot it reads.
//!
//! ## Overview
//!
//! When an item enters embargo, its read grants are derived from the groups
//! that can read its owning collection:
//!
//! - **Anonymous**: if the public can read the collection, public read on the
//!   item is bounded by the embargo date
//! - **Institutional**: if the terms restrict the embargo to the institution
//!   and the institutional group can read the collection, it gets unbounded
//!   read on the item
//!
//! ## Key Types
//!
//! - [`SnapshotReader`] - Reads the authorized groups of a container once
//! - [`EmbargoPolicyGenerator`] - Turns a snapshot and terms into directives
//!
//! ## Usage
//!
//! ```rust,no_run
//! use embargo_kernel_core::{Action, EmbargoTerms, NaiveDate, ReservedGroupNames, ResourceId};
//! use embargo_kernel_policy::{EmbargoPolicyGenerator, SnapshotReader};
//! use embargo_kernel_store::MemoryStore;
//!
//! async fn example(store: MemoryStore) {
//!     let collection = ResourceId(1);
//!     let item = ResourceId(2);
//!     let names = ReservedGroupNames::default();
//!
//!     let authorized = SnapshotReader::new(&store)
//!         .authorized_groups(collection, Action::DefaultItemRead)
//!         .await
//!         .unwrap();
//!
//!     let terms = EmbargoTerms::parse("Restrict to UW");
//!     let directives = EmbargoPolicyGenerator::new(&store, &names)
//!         .generate(
//!             &authorized,
//!             NaiveDate::from_ymd_opt(2026, 1, 1),
//!             Some(terms.kind()),
//!             "embargoed",
//!             item,
//!         )
//!         .await
//!         .unwrap();
//!
//!     for directive in directives {
//!         println!("{directive}");
//!     }
//! }
//! ```

pub mod error;
pub mod generator;
pub mod snapshot;

pub use error::{PolicyError, Result};
pub use generator::EmbargoPolicyGenerator;
pub use snapshot::SnapshotReader;
