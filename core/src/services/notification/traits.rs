//! Mail delivery contract.

use async_trait::async_trait;
use serde::Serialize;

/// Everything needed to render a confirmation mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationEmail {
    /// Recipient address
    pub email: String,
    /// Name used in the greeting
    pub username: String,
    /// Public base URL of this service, used to build the confirmation link
    pub base_url: String,
    /// Email confirmation token
    pub token: String,
}

impl ConfirmationEmail {
    /// Link the recipient follows to confirm the address
    pub fn confirmation_link(&self) -> String {
        format!(
            "{}/api/auth/confirmed_email/{}",
            self.base_url.trim_end_matches('/'),
            self.token
        )
    }
}

/// Mail delivery service
///
/// Callers dispatch on a background task and only log failures.
#[async_trait]
pub trait ConfirmationMailer: Send + Sync + 'static {
    /// Deliver a confirmation mail, returning the provider's message id
    async fn send_confirmation(&self, mail: &ConfirmationEmail) -> Result<String, String>;
}
