//! # Embargo Kernel Core
//!
//! Pure primitives for embargo policy decisions: groups, resources, actions,
//! embargo terms, and the policy directives the decision engine emits.
//!
//! This crate contains no I/O, no storage, no logging. It is plain data plus
//! the small amount of interpretation that belongs at the boundary (terms
//! classification and reserved group naming).
//!
//! ## Key Types
//!
//! - [`Group`] / [`GroupId`] - An access-control group
//! - [`ResourceId`] - Any repository object (item or collection)
//! - [`Action`] - What a policy permits
//! - [`AuthorizedGroupSet`] - Snapshot of groups authorized on a container
//! - [`EmbargoTerms`] / [`EmbargoKind`] - Classified depositor terms
//! - [`PolicyDirective`] / [`EffectiveUntil`] - Output of the decision engine
//! - [`ResourcePolicy`] - A durable grant record
//! - [`ReservedRole`] / [`ReservedGroupNames`] - Role-based group naming

pub mod directive;
pub mod error;
pub mod group;
pub mod terms;
pub mod types;

pub use directive::{EffectiveUntil, PolicyDirective, ResourcePolicy};
pub use error::{CoreError, Result};
pub use group::{AuthorizedGroupSet, Group, ReservedGroupNames, ReservedRole};
pub use terms::{EmbargoKind, EmbargoTerms, DEFAULT_RESTRICTION_MARKER};
pub use types::{parse_embargo_date, Action, GroupId, PolicyId, ResourceId};

/// Re-export of the date type used for embargo expiry.
pub use chrono::NaiveDate;
