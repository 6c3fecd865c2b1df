use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use desk_core::SubdomainConstraint;

use crate::middlewares::request_host;
use crate::negotiate::{self, ResponseFormat};

/// Route layer for tenant-scoped route groups.
///
/// Hosts without a usable subdomain (apex, reserved labels) do not match,
/// and the route resolves to a negotiated 404.
pub async fn require_subdomain(
    State(constraint): State<SubdomainConstraint>,
    req: Request,
    next: Next,
) -> Response {
    let host = request_host(&req).unwrap_or_default();
    if constraint.matches(&host) {
        return next.run(req).await;
    }

    tracing::debug!(host = %host, path = %req.uri().path(), "host does not match tenant routes");
    negotiate::tenant_not_found(ResponseFormat::negotiate(req.headers(), req.uri()))
}
