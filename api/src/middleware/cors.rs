//! CORS middleware configuration for cross-origin requests.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use cb_shared::config::CorsConfig;

/// Builds the CORS layer
///
/// An empty origin list accepts any origin, which is the default; otherwise
/// only the listed origins are allowed.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static(super::timing::PERFORMANCE_HEADER),
            header::RETRY_AFTER,
        ])
        .max_age(config.max_age);

    if config.is_permissive() {
        log::info!("CORS: accepting any origin");
        cors = cors.allow_any_origin().supports_credentials();
    } else {
        for origin in &config.allowed_origins {
            log::info!("CORS: adding allowed origin {}", origin);
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
