//! Strong type definitions for the Embargo Kernel.
//!
//! All identifiers are newtypes to prevent mixing a group id with a
//! resource id at compile time.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Stable identifier of an access-control group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub i64);

/// Identifier of a repository object: an item being embargoed or the
/// collection that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub i64);

/// Identifier of a persisted resource policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolicyId(pub i64);

macro_rules! id_conversions {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Get the raw numeric id.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

id_conversions!(GroupId, "group");
id_conversions!(ResourceId, "resource");
id_conversions!(PolicyId, "policy");

/// An action a resource policy can permit.
///
/// Directives produced by the embargo engine always carry [`Action::Read`].
/// The collection-level `Default*Read` actions describe who may read objects
/// deposited into a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Read,
    Write,
    Add,
    Remove,
    Admin,
    DefaultItemRead,
    DefaultBitstreamRead,
}

impl Action {
    /// Canonical name, as stored in the policy tables.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "READ",
            Action::Write => "WRITE",
            Action::Add => "ADD",
            Action::Remove => "REMOVE",
            Action::Admin => "ADMIN",
            Action::DefaultItemRead => "DEFAULT_ITEM_READ",
            Action::DefaultBitstreamRead => "DEFAULT_BITSTREAM_READ",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "READ" => Ok(Action::Read),
            "WRITE" => Ok(Action::Write),
            "ADD" => Ok(Action::Add),
            "REMOVE" => Ok(Action::Remove),
            "ADMIN" => Ok(Action::Admin),
            "DEFAULT_ITEM_READ" => Ok(Action::DefaultItemRead),
            "DEFAULT_BITSTREAM_READ" => Ok(Action::DefaultBitstreamRead),
            other => Err(CoreError::UnknownAction(other.to_string())),
        }
    }
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`) into an embargo date.
pub fn parse_embargo_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| CoreError::InvalidDate {
        input: input.to_string(),
        reason: e.to_string(),
    })
}
