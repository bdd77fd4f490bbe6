//! Session resolver: turns an access token into the current user.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::entities::token::TokenPurpose;
use crate::domain::entities::user::User;
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use crate::services::cache::UserCache;
use crate::services::token::TokenService;

/// Bound on the store lookup made on a cache miss
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves the user behind an access token
///
/// Reads through the user cache and falls back to the store. Cache trouble is
/// invisible here; store trouble is not.
pub struct SessionResolver<U: UserRepository> {
    tokens: Arc<TokenService>,
    cache: Arc<dyn UserCache>,
    users: Arc<U>,
    store_timeout: Duration,
}

impl<U: UserRepository> SessionResolver<U> {
    pub fn new(tokens: Arc<TokenService>, cache: Arc<dyn UserCache>, users: Arc<U>) -> Self {
        Self {
            tokens,
            cache,
            users,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Resolves the caller of a request
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The account named by a valid access token
    /// * `Err(DomainError::Token)` - Invalid, expired or wrong-purpose token
    /// * `Err(DomainError::Unauthorized)` - Token names no account
    /// * `Err(DomainError::ServiceUnavailable)` - Store failed or timed out on a miss
    pub async fn resolve(&self, bearer: &str) -> Result<User, DomainError> {
        let email = self.tokens.verify(bearer, TokenPurpose::Access)?;

        if let Some(user) = self.cache.get(&email).await {
            debug!("Session resolved from cache");
            return Ok(user);
        }

        let lookup = tokio::time::timeout(self.store_timeout, self.users.find_by_email(&email));
        let user = match lookup.await {
            Ok(Ok(Some(user))) => user,
            Ok(Ok(None)) => {
                debug!("Access token names an unknown account");
                return Err(DomainError::Unauthorized);
            }
            Ok(Err(e)) => {
                warn!("User store failed during session resolution: {}", e);
                return Err(e);
            }
            Err(_) => {
                warn!("User store timed out during session resolution");
                return Err(DomainError::store_failure("user store timed out"));
            }
        };

        self.cache.put(&user).await;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    use crate::errors::TokenError;
    use crate::repositories::MockUserRepository;
    use crate::services::cache::{
        FailingCacheBackend, InMemoryCacheBackend, KeyValueUserCache, NoopUserCache,
        UserCacheConfig,
    };
    use crate::services::clock::ManualClock;
    use crate::services::token::TokenServiceConfig;

    struct Fixture {
        resolver: SessionResolver<MockUserRepository>,
        tokens: Arc<TokenService>,
        users: Arc<MockUserRepository>,
        clock: Arc<ManualClock>,
    }

    async fn fixture_with(cache: Option<Arc<dyn UserCache>>) -> Fixture {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        ));
        let tokens =
            Arc::new(TokenService::new(TokenServiceConfig::default(), clock.clone()).unwrap());
        let cache: Arc<dyn UserCache> = match cache {
            Some(cache) => cache,
            None => Arc::new(KeyValueUserCache::new(
                Arc::new(InMemoryCacheBackend::new(clock.clone())),
                UserCacheConfig::default(),
            )),
        };
        let user = User::new("alice".into(), "a@x.com".into(), "hash".into());
        let users = Arc::new(MockUserRepository::with_user(user).await);
        let resolver = SessionResolver::new(tokens.clone(), cache, users.clone());

        Fixture {
            resolver,
            tokens,
            users,
            clock,
        }
    }

    #[tokio::test]
    async fn test_resolves_and_caches() {
        let f = fixture_with(None).await;
        let token = f.tokens.issue_access("a@x.com").unwrap();

        let first = f.resolver.resolve(&token).await.unwrap();
        let second = f.resolver.resolve(&token).await.unwrap();

        assert_eq!(first.email, "a@x.com");
        assert_eq!(first, second);
        assert_eq!(f.users.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_expired_access_token_is_rejected() {
        let f = fixture_with(None).await;
        let token = f.tokens.issue_access("a@x.com").unwrap();

        f.clock.advance(ChronoDuration::minutes(16));

        let err = f.resolver.resolve(&token).await.unwrap_err();
        assert!(matches!(err, DomainError::Token(TokenError::TokenExpired)));
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_refresh_token_cannot_authenticate() {
        let f = fixture_with(None).await;
        let token = f.tokens.issue_refresh("a@x.com").unwrap();

        let err = f.resolver.resolve(&token).await.unwrap_err();
        assert!(matches!(err, DomainError::Token(TokenError::PurposeMismatch)));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthorized() {
        let f = fixture_with(None).await;
        let token = f.tokens.issue_access("ghost@x.com").unwrap();

        let err = f.resolver.resolve(&token).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn test_failing_cache_falls_through_to_store() {
        let cache: Arc<dyn UserCache> = Arc::new(KeyValueUserCache::new(
            Arc::new(FailingCacheBackend),
            UserCacheConfig::default(),
        ));
        let f = fixture_with(Some(cache)).await;
        let token = f.tokens.issue_access("a@x.com").unwrap();

        assert!(f.resolver.resolve(&token).await.is_ok());
        assert!(f.resolver.resolve(&token).await.is_ok());
        assert_eq!(f.users.lookup_count(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_on_miss_is_service_unavailable() {
        let f = fixture_with(Some(Arc::new(NoopUserCache))).await;
        let token = f.tokens.issue_access("a@x.com").unwrap();
        f.users.set_failure(true);

        let err = f.resolver.resolve(&token).await.unwrap_err();
        assert!(matches!(err, DomainError::ServiceUnavailable { .. }));
        assert!(!err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_cache_hit_survives_store_outage() {
        let f = fixture_with(None).await;
        let token = f.tokens.issue_access("a@x.com").unwrap();
        f.resolver.resolve(&token).await.unwrap();

        f.users.set_failure(true);

        assert!(f.resolver.resolve(&token).await.is_ok());
    }
}
