//! Account lifecycle: signup, login, token refresh, email confirmation,
//! avatar changes and logout.
//!
//! Every path that mutates an account writes the store first and then
//! overwrites the cached copy with the mutated user, so a cached read never
//! trails a completed write.

mod commands;
mod config;
mod service;


pub use commands::SignupCommand;
pub use config::AuthServiceConfig;
pub use service::AuthService;
