//! Confirmation mail delivery
//!
//! Both mailers implement `cb_core`'s `ConfirmationMailer`; the API picks one
//! at startup from `EmailConfig::provider`.

pub mod http_mailer;
pub mod log_mailer;
mod template;

use async_trait::async_trait;

use cb_core::services::notification::{ConfirmationEmail, ConfirmationMailer};
use cb_shared::config::EmailProvider;

use crate::config::EmailConfig;
use crate::InfrastructureError;

pub use http_mailer::HttpMailer;
pub use log_mailer::LogMailer;

/// Mailer selected by configuration
pub enum ConfiguredMailer {
    Log(LogMailer),
    Http(HttpMailer),
}

impl ConfiguredMailer {
    pub fn from_config(config: EmailConfig) -> Result<Self, InfrastructureError> {
        match config.provider {
            EmailProvider::Mock => Ok(ConfiguredMailer::Log(LogMailer::new())),
            EmailProvider::Http => Ok(ConfiguredMailer::Http(HttpMailer::new(config)?)),
        }
    }
}

#[async_trait]
impl ConfirmationMailer for ConfiguredMailer {
    async fn send_confirmation(&self, mail: &ConfirmationEmail) -> Result<String, String> {
        match self {
            ConfiguredMailer::Log(mailer) => mailer.send_confirmation(mail).await,
            ConfiguredMailer::Http(mailer) => mailer.send_confirmation(mail).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_selects_mailer() {
        let mock = ConfiguredMailer::from_config(EmailConfig::default()).unwrap();
        assert!(matches!(mock, ConfiguredMailer::Log(_)));

        let http = ConfiguredMailer::from_config(EmailConfig {
            provider: EmailProvider::Http,
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(http, ConfiguredMailer::Http(_)));
    }
}
