//! Groups, authorization snapshots, and reserved group roles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::GroupId;

/// An access-control group. Owned by the hosting platform; immutable here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

impl Group {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: GroupId(id),
            name: name.into(),
        }
    }
}

/// The groups currently permitted an action on a container.
///
/// A snapshot taken once per embargo application. There is no way to add or
/// remove members after construction; membership is decided by [`GroupId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizedGroupSet {
    groups: BTreeMap<GroupId, Group>,
}

impl AuthorizedGroupSet {
    /// Check whether a group is in the snapshot.
    pub fn contains(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Look up a member by id.
    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<Group> for AuthorizedGroupSet {
    fn from_iter<I: IntoIterator<Item = Group>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().map(|g| (g.id, g)).collect(),
        }
    }
}

/// A population the embargo engine treats specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedRole {
    /// Unauthenticated, general public access.
    Anonymous,
    /// The institutional population that keeps access during a restricted
    /// embargo.
    Institutional,
}

impl ReservedRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReservedRole::Anonymous => "anonymous",
            ReservedRole::Institutional => "institutional",
        }
    }
}

impl std::fmt::Display for ReservedRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names under which the reserved groups are registered in the group
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReservedGroupNames {
    pub anonymous: String,
    pub institutional: String,
}

impl ReservedGroupNames {
    pub const DEFAULT_ANONYMOUS: &'static str = "Anonymous";
    pub const DEFAULT_INSTITUTIONAL: &'static str = "UW_Users";

    /// The directory name for a role.
    pub fn name_for(&self, role: ReservedRole) -> &str {
        match role {
            ReservedRole::Anonymous => &self.anonymous,
            ReservedRole::Institutional => &self.institutional,
        }
    }
}

impl Default for ReservedGroupNames {
    fn default() -> Self {
        Self {
            anonymous: Self::DEFAULT_ANONYMOUS.to_string(),
            institutional: Self::DEFAULT_INSTITUTIONAL.to_string(),
        }
    }
}
