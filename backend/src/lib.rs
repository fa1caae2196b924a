//! User registry library modules.
//!
//! The domain owns validation, id allocation and the mutation lock; inbound
//! HTTP handlers and the outbound JSON file store sit at the edges.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
