//! Policy directives and durable resource policies.
//!
//! A [`PolicyDirective`] is what the decision engine emits: an instruction
//! to create or update one read grant. A [`ResourcePolicy`] is the record a
//! policy store keeps once a directive has been applied.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::group::Group;
use crate::types::{Action, GroupId, PolicyId, ResourceId};

/// How long a grant stays withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveUntil {
    /// The grant takes effect when the embargo lifts on this date.
    Until(NaiveDate),
    /// The grant takes effect immediately and never lapses.
    Unbounded,
}

impl EffectiveUntil {
    /// The first day of the grant as stored on a policy record, `None`
    /// when it applies from the start.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            EffectiveUntil::Until(date) => Some(*date),
            EffectiveUntil::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, EffectiveUntil::Unbounded)
    }
}

impl From<Option<NaiveDate>> for EffectiveUntil {
    fn from(date: Option<NaiveDate>) -> Self {
        match date {
            Some(date) => EffectiveUntil::Until(date),
            None => EffectiveUntil::Unbounded,
        }
    }
}

impl fmt::Display for EffectiveUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectiveUntil::Until(date) => write!(f, "until {date}"),
            EffectiveUntil::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// An instruction to create or update a grant on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDirective {
    /// The resource being embargoed.
    pub resource: ResourceId,
    /// The group receiving the grant.
    pub group: Group,
    pub action: Action,
    pub effective_until: EffectiveUntil,
    /// Human-readable reason recorded on the grant.
    pub reason: String,
}

impl PolicyDirective {
    /// A read grant, the only kind the embargo engine produces.
    pub fn read(
        resource: ResourceId,
        group: Group,
        effective_until: EffectiveUntil,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            resource,
            group,
            action: Action::Read,
            effective_until,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PolicyDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} on {} {}",
            self.group.name, self.action, self.resource, self.effective_until
        )
    }
}

/// A grant record held by a policy store.
///
/// Unique per `(resource, group, action)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePolicy {
    pub id: PolicyId,
    pub resource: ResourceId,
    pub group: GroupId,
    pub action: Action,
    pub start_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

impl ResourcePolicy {
    /// Check whether the grant is in force on a given day.
    ///
    /// Nothing is readable before the start date; the start date itself is.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| day >= start)
    }

    pub fn effective_until(&self) -> EffectiveUntil {
        self.start_date.into()
    }
}
