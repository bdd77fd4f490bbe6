//! Repository interfaces for the persistent store.

pub mod contact;
pub mod user;

pub use contact::{ContactFilter, ContactRepository};
pub use user::UserRepository;

#[cfg(any(test, feature = "mock-services"))]
pub use contact::MockContactRepository;
#[cfg(any(test, feature = "mock-services"))]
pub use user::MockUserRepository;
