pub mod constraint;
pub mod errors;
pub mod tenant;

pub use constraint::require_subdomain;
pub use errors::translate_errors;
pub use tenant::{ResolveTenant, ResolveTenantLayer};

use axum::http::{header, Request};

/// Host the client addressed: `Host` header, else the URI authority.
pub(crate) fn request_host<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.as_str().to_string()))
}
