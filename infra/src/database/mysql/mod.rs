//! MySQL repository implementations

mod errors;
pub mod contact_repository_impl;
pub mod user_repository_impl;

pub use contact_repository_impl::MySqlContactRepository;
pub use user_repository_impl::MySqlUserRepository;
