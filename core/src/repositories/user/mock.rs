//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::trait_::UserRepository;

/// In-memory user store keyed by email
///
/// Counts lookups so tests can tell cache hits from store reads, and can be
/// switched into a failing mode to simulate an unreachable database.
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
    lookups: AtomicU64,
    simulate_failure: AtomicBool,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            lookups: AtomicU64::new(0),
            simulate_failure: AtomicBool::new(false),
        }
    }

    /// Create a repository holding one user
    pub async fn with_user(user: User) -> Self {
        let repo = Self::new();
        repo.users.write().await.insert(user.email.clone(), user);
        repo
    }

    /// Number of `find_by_email` calls served so far
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail as if the database were down
    pub fn set_failure(&self, fail: bool) {
        self.simulate_failure.store(fail, Ordering::SeqCst);
    }

    /// Direct read, bypassing counters and failure injection
    pub async fn snapshot(&self, email: &str) -> Option<User> {
        self.users.read().await.get(email).cloned()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err(DomainError::store_failure("mock store unavailable"));
        }
        Ok(())
    }

    async fn mutate<F>(&self, email: &str, f: F) -> Result<User, DomainError>
    where
        F: FnOnce(&mut User) + Send,
    {
        self.check_available()?;
        let mut users = self.users.write().await;
        let user = users
            .get_mut(email)
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        f(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        self.check_available()?;
        let mut users = self.users.write().await;

        if users.contains_key(&user.email) {
            return Err(DomainError::conflict("Account already exists"));
        }

        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn update_refresh_token(
        &self,
        user: &User,
        token: Option<&str>,
    ) -> Result<(), DomainError> {
        let token = token.map(str::to_string);
        self.mutate(&user.email, |u| u.refresh_token = token).await?;
        Ok(())
    }

    async fn set_confirmed(&self, email: &str) -> Result<(), DomainError> {
        self.mutate(email, |u| u.confirmed = true).await?;
        Ok(())
    }

    async fn set_avatar(&self, email: &str, url: &str) -> Result<User, DomainError> {
        let url = url.to_string();
        self.mutate(email, |u| u.avatar = Some(url)).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.check_available()?;
        Ok(self.users.read().await.len() as u64)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.check_available()
    }
}
