//! Mailer that only writes the message to the log

use async_trait::async_trait;
use uuid::Uuid;

use cb_core::services::notification::{ConfirmationEmail, ConfirmationMailer};
use cb_shared::utils::validation::mask_email;

/// Development mailer; the confirmation link is logged at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConfirmationMailer for LogMailer {
    async fn send_confirmation(&self, mail: &ConfirmationEmail) -> Result<String, String> {
        let message_id = format!("log-{}", Uuid::new_v4());
        tracing::info!(
            "[LOG MAILER] Confirmation for {} ({}): {}",
            mask_email(&mail.email),
            message_id,
            mail.confirmation_link()
        );
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_always_accepts() {
        let mail = ConfirmationEmail {
            email: "a@x.com".to_string(),
            username: "alice".to_string(),
            base_url: "http://localhost:8000".to_string(),
            token: "tok".to_string(),
        };
        let id = LogMailer::new().send_confirmation(&mail).await.unwrap();
        assert!(id.starts_with("log-"));
    }
}
