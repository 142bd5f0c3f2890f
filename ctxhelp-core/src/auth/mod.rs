// File: ctxhelp-core/src/auth/mod.rs

use ctxhelp_common::models::Actor;
pub use ctxhelp_common::traits::auth_traits::EditorPolicy;

/// Default role allowed to edit help content.
pub const EDITOR_ROLE: &str = "ContextHelpEditor";

/// Grants editing to members of one role.
#[derive(Debug, Clone)]
pub struct RolePolicy {
    role: String,
}

impl RolePolicy {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::new(EDITOR_ROLE)
    }
}

impl EditorPolicy for RolePolicy {
    fn may_edit(&self, actor: &Actor) -> bool {
        actor.is_in_role(&self.role)
    }
}

pub struct AllowAll;

impl EditorPolicy for AllowAll {
    fn may_edit(&self, _actor: &Actor) -> bool {
        true
    }
}

pub struct DenyAll;

impl EditorPolicy for DenyAll {
    fn may_edit(&self, _actor: &Actor) -> bool {
        false
    }
}
