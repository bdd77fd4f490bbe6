//! Outbound mail configuration

use serde::{Deserialize, Serialize};

/// Which mailer implementation to wire at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    /// Log the message instead of sending it
    Mock,
    /// POST the message to an HTTP mail relay
    Http,
}

impl std::str::FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" | "log" => Ok(EmailProvider::Mock),
            "http" | "api" => Ok(EmailProvider::Http),
            _ => Err(format!("Invalid email provider: {}", s)),
        }
    }
}

/// Mail relay configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    /// Relay endpoint accepting a JSON message
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
    pub from_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::Mock,
            api_url: String::from("http://localhost:8025/api/send"),
            api_key: String::new(),
            from_address: String::from("no-reply@contact-book.local"),
            from_name: String::from("Contact Book"),
            timeout_seconds: 10,
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("EMAIL_PROVIDER")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.provider),
            api_url: std::env::var("EMAIL_API_URL").unwrap_or(defaults.api_url),
            api_key: std::env::var("EMAIL_API_KEY").unwrap_or(defaults.api_key),
            from_address: std::env::var("EMAIL_FROM").unwrap_or(defaults.from_address),
            from_name: std::env::var("EMAIL_FROM_NAME").unwrap_or(defaults.from_name),
            timeout_seconds: super::env_or("EMAIL_TIMEOUT_SECONDS", defaults.timeout_seconds),
        }
    }
}
