//! # Embargo Kernel Testkit
//!
//! Testing utilities for the Embargo Kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Scenario vectors**: Known embargo applications with the grants they must produce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A seeded in-memory repository for setting up test scenarios
//!
//! ## Scenario Vectors
//!
//! ```rust,no_run
//! use embargo_kernel_testkit::vectors::verify_all_scenarios;
//!
//! async fn check() {
//!     for (name, matched, produced) in verify_all_scenarios().await {
//!         println!("{name}: {matched} ({produced})");
//!     }
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use embargo_kernel_testkit::generators::{fixture_from_params, EmbargoParams};
//!
//! proptest! {
//!     #[test]
//!     fn never_more_than_two(params: EmbargoParams) {
//!         let fixture = fixture_from_params(&params).unwrap();
//!         // plan and check the directives
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use embargo_kernel_testkit::fixtures::RepositoryFixture;
//!
//! let fixture = RepositoryFixture::new();
//! fixture.grant(&fixture.anonymous).unwrap();
//! let setter = fixture.setter();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::RepositoryFixture;
pub use generators::{fixture_from_params, plan_from_params, CollectionReaders, EmbargoParams};
pub use vectors::{all_scenarios, run_scenario, verify_all_scenarios, ScenarioVector};
