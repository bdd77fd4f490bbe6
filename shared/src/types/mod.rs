//! Type definitions shared by the API and its clients
//!
//! - `pagination` - skip/limit windows for list endpoints
//! - `response` - plain message and health check bodies

pub mod pagination;
pub mod response;

pub use pagination::Pagination;
pub use response::{HealthResponse, MessageResponse};
