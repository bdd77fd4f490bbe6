//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// A fixed-window request budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointLimit {
    /// Requests allowed inside one window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_seconds: u64,
}

impl EndpointLimit {
    pub const fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window_seconds,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Contact creation budget per user
    pub create_contact: EndpointLimit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            create_contact: EndpointLimit::new(2, 5),
        }
    }
}

impl RateLimitConfig {
    /// Configuration with limiting switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_creation_budget() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.create_contact, EndpointLimit::new(2, 5));
        assert!(!RateLimitConfig::disabled().enabled);
    }
}
