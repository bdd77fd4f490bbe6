//! Bearer token to user resolution

mod resolver;

pub use resolver::{SessionResolver, DEFAULT_STORE_TIMEOUT};
