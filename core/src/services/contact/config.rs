//! Configuration for the contact service

use cb_shared::config::RateLimitConfig;

/// Bounds and budgets of the contact endpoints
#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// Per-user budget for contact creation
    pub rate_limit: RateLimitConfig,
    /// Page size bounds of contact listings
    pub list_limit_range: (u32, u32),
    /// Accepted span of the birthday window in days
    pub birthday_days_range: (u32, u32),
    /// Page size bounds of the birthday query
    pub birthday_limit_range: (u32, u32),
}

impl Default for ContactServiceConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            list_limit_range: (10, 100),
            birthday_days_range: (1, 30),
            birthday_limit_range: (1, 30),
        }
    }
}

impl ContactServiceConfig {
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}
