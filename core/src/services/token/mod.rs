//! Token service module for JWT management
//!
//! Issues and verifies the three token kinds used by the application:
//! - Access tokens presented as bearer credentials
//! - Refresh tokens exchanged for a new pair
//! - Email confirmation tokens embedded in confirmation links

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
