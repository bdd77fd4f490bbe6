//! Outbound confirmation mail

mod traits;

#[cfg(any(test, feature = "mock-services"))]
mod mock;

pub use traits::{ConfirmationEmail, ConfirmationMailer};

#[cfg(any(test, feature = "mock-services"))]
pub use mock::RecordingMailer;
