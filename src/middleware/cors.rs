use actix_cors::Cors;
use actix_web::http::{header, Method};

/// CORS policy for the browser frontend: a single origin, with credentials.
///
/// Preflight requests are answered here, before the session middleware runs.
pub fn frontend_cors(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}
