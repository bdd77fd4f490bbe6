//! Mail delivery through an HTTP relay accepting JSON messages

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use cb_core::services::notification::{ConfirmationEmail, ConfirmationMailer};
use cb_shared::utils::validation::mask_email;

use crate::config::EmailConfig;
use crate::InfrastructureError;

use super::template::{confirmation_html, CONFIRMATION_SUBJECT};

#[derive(Debug, Serialize, PartialEq, Eq)]
struct Mailbox {
    email: String,
    name: String,
}

/// Message body posted to the relay
#[derive(Debug, Serialize, PartialEq, Eq)]
struct OutgoingMessage {
    from: Mailbox,
    to: Vec<Mailbox>,
    subject: String,
    html: String,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    id: Option<String>,
}

/// Mailer posting each message to `EmailConfig::api_url`
pub struct HttpMailer {
    client: Client,
    config: EmailConfig,
}

impl HttpMailer {
    pub fn new(config: EmailConfig) -> Result<Self, InfrastructureError> {
        if config.api_url.is_empty() {
            return Err(InfrastructureError::Config(
                "EMAIL_API_URL must be set for the http provider".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    fn build_message(&self, mail: &ConfirmationEmail) -> OutgoingMessage {
        OutgoingMessage {
            from: Mailbox {
                email: self.config.from_address.clone(),
                name: self.config.from_name.clone(),
            },
            to: vec![Mailbox {
                email: mail.email.clone(),
                name: mail.username.clone(),
            }],
            subject: CONFIRMATION_SUBJECT.to_string(),
            html: confirmation_html(mail),
        }
    }

    async fn post(&self, message: &OutgoingMessage) -> Result<String, InfrastructureError> {
        let mut request = self.client.post(&self.config.api_url).json(message);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InfrastructureError::Email(format!(
                "relay answered {}: {}",
                status, body
            )));
        }

        let parsed: RelayResponse = response.json().await.unwrap_or(RelayResponse { id: None });
        Ok(parsed
            .id
            .unwrap_or_else(|| format!("http-{}", uuid::Uuid::new_v4())))
    }
}

#[async_trait]
impl ConfirmationMailer for HttpMailer {
    async fn send_confirmation(&self, mail: &ConfirmationEmail) -> Result<String, String> {
        let message = self.build_message(mail);
        match self.post(&message).await {
            Ok(id) => {
                tracing::info!("Confirmation mail sent to {}", mask_email(&mail.email));
                Ok(id)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to send confirmation mail to {}: {}",
                    mask_email(&mail.email),
                    e
                );
                Err(e.to_string())
            }
        }
    }
}
