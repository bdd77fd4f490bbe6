//! HTTP route handlers, grouped by resource

pub mod auth;
pub mod contacts;
pub mod health;
pub mod users;
