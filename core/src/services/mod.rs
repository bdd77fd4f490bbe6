//! Business services containing domain logic and use cases.

pub mod auth;
pub mod avatar;
pub mod cache;
pub mod clock;
pub mod contact;
pub mod notification;
pub mod password;
pub mod rate_limit;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, SignupCommand};
pub use avatar::AvatarStorage;
pub use cache::{
    CacheBackend, CachedUser, KeyValueUserCache, NoopUserCache, UserCache, UserCacheConfig,
};
pub use clock::{Clock, SystemClock};
pub use contact::{ContactService, ContactServiceConfig, RoleAccess};
pub use notification::{ConfirmationEmail, ConfirmationMailer};
pub use password::{BcryptPasswordHasher, PasswordHasher};
pub use rate_limit::{RateDecision, RateLimiterTrait};
pub use session::SessionResolver;
pub use token::{TokenService, TokenServiceConfig};
