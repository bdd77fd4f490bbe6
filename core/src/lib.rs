//! # Contact Book Core
//!
//! Domain layer of the contact book backend: entities, repository
//! interfaces, error types and the services built on them (tokens, the user
//! cache, session resolution, accounts and contacts).

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience. Submodule names overlap
// across layers (`contact`, `token`, `user`, `avatar`), so only items are
// lifted to the crate root.
pub use domain::{
    avatar_public_id, gravatar_url, AvatarUpload, Claims, ConfirmationOutcome, Contact,
    ContactDraft, EmailRequestOutcome, Role, TokenPair, TokenPurpose, User,
};
pub use errors::{
    AuthError, CacheError, DomainError, DomainResult, TokenError, ValidationError,
};
pub use repositories::{ContactFilter, ContactRepository, UserRepository};
pub use services::{
    AuthService, AuthServiceConfig, AvatarStorage, CacheBackend, CachedUser, Clock,
    ConfirmationEmail, ConfirmationMailer, ContactService, ContactServiceConfig,
    KeyValueUserCache, NoopUserCache, PasswordHasher, RateDecision, RateLimiterTrait,
    RoleAccess, SessionResolver, SignupCommand, SystemClock, TokenService,
    TokenServiceConfig, UserCache, UserCacheConfig, BcryptPasswordHasher,
};

/// In-memory collaborators for tests in this and downstream crates
#[cfg(any(test, feature = "mock-services"))]
pub mod mock {
    pub use crate::repositories::{MockContactRepository, MockUserRepository};
    pub use crate::services::avatar::MockAvatarStorage;
    pub use crate::services::cache::{
        FailingCacheBackend, InMemoryCacheBackend, StallingCacheBackend,
    };
    pub use crate::services::clock::ManualClock;
    pub use crate::services::notification::RecordingMailer;
    pub use crate::services::rate_limit::MockRateLimiter;
}
