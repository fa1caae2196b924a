//! Shared cache-control policies for HTTP handlers.

use actix_web::http::header;

/// Responses that must never be served from a cache.
pub const NO_STORE: &str = "no-store";

/// Build the cache-control header tuple for responses that must not be cached.
pub const fn no_store_header() -> (header::HeaderName, &'static str) {
    (header::CACHE_CONTROL, NO_STORE)
}
