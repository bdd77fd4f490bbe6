//! Request and response bodies of the HTTP API

pub mod auth;
pub mod contact;
pub mod error;

pub use error::{ErrorResponse, ErrorResponseExt};
