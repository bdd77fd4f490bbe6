//! Per-user address book operations

mod access;
mod config;
mod service;


pub use access::RoleAccess;
pub use config::ContactServiceConfig;
pub use service::ContactService;
