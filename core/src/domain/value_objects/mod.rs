//! Value objects produced by domain services.

pub mod avatar;
pub mod confirmation;

pub use avatar::{avatar_public_id, gravatar_url, AvatarUpload};
pub use confirmation::{ConfirmationOutcome, EmailRequestOutcome};
