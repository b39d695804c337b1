//! Configuration for the embargo setter.

use std::path::Path;

use embargo_kernel_core::{Action, ReservedGroupNames, DEFAULT_RESTRICTION_MARKER};
use serde::{Deserialize, Serialize};

use crate::error::{EmbargoError, Result};

/// Configuration for the [`EmbargoSetter`](crate::EmbargoSetter).
///
/// Every field has a default matching the hosting platform's conventions,
/// so a JSON document only needs the values that differ:
///
/// ```json
/// {
///     "reserved_groups": { "institutional": "Campus_Users" },
///     "restriction_marker": "Restrict to campus"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbargoConfig {
    /// Directory names of the reserved groups.
    pub reserved_groups: ReservedGroupNames,
    /// Phrase in the terms that restricts an embargo to the institution.
    pub restriction_marker: String,
    /// Action snapshotted on the owning collection.
    pub snapshot_action: Action,
}

impl Default for EmbargoConfig {
    fn default() -> Self {
        Self {
            reserved_groups: ReservedGroupNames::default(),
            restriction_marker: DEFAULT_RESTRICTION_MARKER.to_string(),
            snapshot_action: Action::DefaultItemRead,
        }
    }
}

impl EmbargoConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject configurations the setter cannot act on.
    pub fn validate(&self) -> Result<()> {
        let names = &self.reserved_groups;
        if names.anonymous.trim().is_empty() || names.institutional.trim().is_empty() {
            return Err(EmbargoError::InvalidConfig(
                "reserved group names must not be empty".to_string(),
            ));
        }
        if names.anonymous == names.institutional {
            return Err(EmbargoError::InvalidConfig(format!(
                "anonymous and institutional groups are both named {:?}",
                names.anonymous
            )));
        }
        if self.restriction_marker.trim().is_empty() {
            return Err(EmbargoError::InvalidConfig(
                "restriction marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
