//! Tenant resolution middleware.
//!
//! Runs for every request before routing. The leftmost subdomain label of
//! the host is looked up in the tenant directory:
//! - no subdomain: the request passes through without a tenant
//! - known tenant: it becomes part of the request's [`Current`]
//! - unknown tenant: negotiated 404, the router is never called
//!
//! Downstream runs inside [`current::scope`], so the context is cleared on
//! every exit path.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use desk_core::current::{self, Current, CurrentUser};
use desk_core::{tenant_subdomain, DeskApp};
use tower::{Layer, Service};

use crate::middlewares::request_host;
use crate::negotiate::{self, ResponseFormat};
use crate::DeskAxumError;

const REQUEST_ID_HEADER: &str = "x-request-id";
const DEFAULT_USER_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct ResolveTenantLayer {
    app: DeskApp,
    user_header: String,
    tld_length: usize,
}

impl ResolveTenantLayer {
    /// The acting user is read from `auth.user_header` (default `x-user-id`),
    /// which a trusted upstream authentication layer is expected to set.
    /// Both that header and `tenancy.tld_length` are read once, here.
    pub fn new(app: DeskApp) -> Self {
        let user_header = app
            .get("auth.user_header")
            .map(|h| h.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_USER_HEADER.to_string());
        let tld_length = app.tld_length();
        Self {
            app,
            user_header,
            tld_length,
        }
    }
}

impl<S> Layer<S> for ResolveTenantLayer {
    type Service = ResolveTenant<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResolveTenant {
            inner,
            app: self.app.clone(),
            user_header: self.user_header.clone(),
            tld_length: self.tld_length,
        }
    }
}

#[derive(Clone)]
pub struct ResolveTenant<S> {
    inner: S,
    app: DeskApp,
    user_header: String,
    tld_length: usize,
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl<S> Service<Request<Body>> for ResolveTenant<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Keep the service that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let app = self.app.clone();
        let user_header = self.user_header.clone();
        let tld_length = self.tld_length;

        Box::pin(async move {
            let format = ResponseFormat::negotiate(req.headers(), req.uri());
            let host = request_host(&req).unwrap_or_default();

            let mut current = Current::new();
            if let Some(request_id) = header_value(&req, REQUEST_ID_HEADER) {
                current = current.with_request_id(request_id);
            }
            if let Some(user) = header_value(&req, &user_header) {
                current = current.with_user(CurrentUser(user));
            }

            if let Some(label) = tenant_subdomain(&host, tld_length) {
                match app.tenants().find_by_subdomain(&label).await {
                    Ok(Some(tenant)) => {
                        tracing::debug!(tenant_id = %tenant.id, subdomain = %label, "tenant resolved");
                        if let Err(e) = current.set_tenant(tenant) {
                            return Ok(DeskAxumError::from(e).into_response());
                        }
                    }
                    Ok(None) => {
                        tracing::warn!(subdomain = %label, host = %host, "unknown tenant");
                        return Ok(negotiate::tenant_not_found(format));
                    }
                    Err(e) => {
                        tracing::error!(subdomain = %label, error = %e, "tenant lookup failed");
                        return Ok(DeskAxumError::from(e).into_response());
                    }
                }
            }

            current::scope(current, async move { inner.call(req).await }).await
        })
    }
}
