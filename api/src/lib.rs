//! HTTP surface of the contact book
//!
//! Exposed as a library so integration tests can build the application
//! against in-memory collaborators.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
