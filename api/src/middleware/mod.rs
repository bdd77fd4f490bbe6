pub mod auth;
pub mod cors;
pub mod timing;

pub use auth::{BearerToken, CurrentUser, SessionResolverWrapper};
pub use cors::create_cors;
pub use timing::ResponseTime;
