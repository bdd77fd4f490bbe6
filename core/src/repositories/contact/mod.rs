pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
#[cfg(any(test, feature = "mock-services"))]
pub mod mock;

pub use r#trait::{ContactFilter, ContactRepository};
#[cfg(any(test, feature = "mock-services"))]
pub use mock::MockContactRepository;
