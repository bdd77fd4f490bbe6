//! Database module - MySQL implementations using SQLx
//!
//! Connection pool management and the repository implementations of the
//! core persistence contracts.

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlContactRepository, MySqlUserRepository};
