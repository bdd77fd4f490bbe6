//! Role gate for contact operations.

use crate::domain::entities::user::{Role, User};
use crate::errors::DomainError;

/// Set of roles allowed to perform an operation
#[derive(Debug, Clone, Copy)]
pub struct RoleAccess {
    allowed: &'static [Role],
}

impl RoleAccess {
    /// Every authenticated account
    pub const ANY: RoleAccess = RoleAccess::new(&[Role::Admin, Role::Moderator, Role::User]);

    /// Accounts that may see and curate every user's contacts
    pub const CURATORS: RoleAccess = RoleAccess::new(&[Role::Admin, Role::Moderator]);

    pub const fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    /// `Forbidden` unless the user holds one of the allowed roles
    pub fn check(&self, user: &User) -> Result<(), DomainError> {
        if user.has_any_role(self.allowed) {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}
