//! User repository trait defining the interface for user data persistence.
//!
//! The store is the source of truth for every account. It is assumed durable
//! and immediately consistent; the user cache sits in front of it for reads
//! only and is never consulted on write paths.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Implementations report infrastructure failures as
/// `DomainError::ServiceUnavailable` and duplicate emails as
/// `DomainError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user registered with that email
    /// * `Err(DomainError)` - Store failure
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError::Conflict)` - The email is already registered
    async fn save(&self, user: User) -> Result<User, DomainError>;

    /// Replace (or clear, with `None`) the stored refresh token
    async fn update_refresh_token(
        &self,
        user: &User,
        token: Option<&str>,
    ) -> Result<(), DomainError>;

    /// Mark the account behind `email` as confirmed
    async fn set_confirmed(&self, email: &str) -> Result<(), DomainError>;

    /// Store a new avatar URL and return the updated user
    async fn set_avatar(&self, email: &str, url: &str) -> Result<User, DomainError>;

    /// Number of registered users
    async fn count(&self) -> Result<u64, DomainError>;

    /// Cheap round trip proving the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
