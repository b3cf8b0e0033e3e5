//! In-memory workspace role directory.

use dashmap::DashMap;
use outlay_core::report::RoleResolver;
use outlay_core::workflow::{RoleSet, WorkspaceRole};
use outlay_shared::types::{UserId, WorkspaceId};

/// Role grants keyed by workspace and user.
#[derive(Debug, Default)]
pub struct InMemoryRoleDirectory {
    grants: DashMap<(WorkspaceId, UserId), RoleSet>,
}

impl InMemoryRoleDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `role` to `user` in `workspace`.
    pub fn grant(&self, workspace: WorkspaceId, user: UserId, role: WorkspaceRole) {
        self.grants.entry((workspace, user)).or_default().insert(role);
    }

    /// Revokes `role`, returning true if it was held.
    pub fn revoke(&self, workspace: WorkspaceId, user: UserId, role: WorkspaceRole) -> bool {
        self.grants
            .get_mut(&(workspace, user))
            .is_some_and(|mut roles| roles.remove(role))
    }
}

impl RoleResolver for InMemoryRoleDirectory {
    fn roles(&self, workspace: WorkspaceId, user: UserId) -> RoleSet {
        self.grants
            .get(&(workspace, user))
            .map(|roles| roles.value().clone())
            .unwrap_or_default()
    }
}
