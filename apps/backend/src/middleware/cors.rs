use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};

use super::request_trace::REQUEST_ID_HEADER;
use super::token_auth::TOKEN_HEADER;

/// Origins used when none are configured.
const LOCALHOST_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Build CORS middleware from the configured origin allowlist.
///
/// Browsers may send the `token` credential header; `x-trace-id` and
/// `x-request-id` are readable from responses.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            HeaderName::from_static(TOKEN_HEADER),
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            HeaderName::from_static("x-trace-id"),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .max_age(3600);

    if allowed_origins.is_empty() {
        for origin in LOCALHOST_ORIGINS {
            cors = cors.allowed_origin(origin);
        }
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
