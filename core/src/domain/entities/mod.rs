//! Domain entities representing core business objects.

pub mod contact;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use contact::{Contact, ContactDraft, NAME_MAX_LENGTH, PHONE_MAX_LENGTH};
pub use token::{
    Claims, TokenPair, TokenPurpose,
    ACCESS_TOKEN_EXPIRY_MINUTES, EMAIL_TOKEN_EXPIRY_DAYS, JWT_ISSUER, REFRESH_TOKEN_EXPIRY_DAYS,
};
pub use user::{Role, User};
