//! Actors and their workspace roles.
//!
//! The engine never looks roles up itself. Callers resolve the role set for
//! a user in a workspace and hand the engine an [`Actor`].

use std::collections::BTreeSet;

use outlay_shared::types::UserId;
use serde::{Deserialize, Serialize};

/// A role a user holds within one workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceRole {
    /// Can file and manage their own reports.
    Member,
    /// Can review reports filed by others.
    Reviewer,
}

impl WorkspaceRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "reviewer" => Some(Self::Reviewer),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Reviewer => "reviewer",
        }
    }
}

/// The set of roles a user holds in a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<WorkspaceRole>);

impl RoleSet {
    /// An empty role set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain member.
    #[must_use]
    pub fn member() -> Self {
        [WorkspaceRole::Member].into_iter().collect()
    }

    /// A member who also reviews.
    #[must_use]
    pub fn reviewer() -> Self {
        [WorkspaceRole::Member, WorkspaceRole::Reviewer]
            .into_iter()
            .collect()
    }

    /// Adds a role, returning true if it was not present.
    pub fn insert(&mut self, role: WorkspaceRole) -> bool {
        self.0.insert(role)
    }

    /// Removes a role, returning true if it was present.
    pub fn remove(&mut self, role: WorkspaceRole) -> bool {
        self.0.remove(&role)
    }

    /// Returns true if the set holds `role`.
    #[must_use]
    pub fn contains(&self, role: WorkspaceRole) -> bool {
        self.0.contains(&role)
    }

    /// Returns true if no roles are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the roles in order.
    pub fn iter(&self) -> impl Iterator<Item = WorkspaceRole> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<WorkspaceRole> for RoleSet {
    fn from_iter<I: IntoIterator<Item = WorkspaceRole>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A user acting on a report, together with their roles in its workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The acting user.
    pub user_id: UserId,
    /// Roles held in the report's workspace.
    pub roles: RoleSet,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(user_id: UserId, roles: RoleSet) -> Self {
        Self { user_id, roles }
    }

    /// A plain workspace member.
    #[must_use]
    pub fn member(user_id: UserId) -> Self {
        Self::new(user_id, RoleSet::member())
    }

    /// A workspace reviewer.
    #[must_use]
    pub fn reviewer(user_id: UserId) -> Self {
        Self::new(user_id, RoleSet::reviewer())
    }
}
