//! Extractors giving handlers explicit access to the request context.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use desk_core::current::{self, Current};
use desk_core::{require_tenant, Tenant};

use crate::DeskAxumError;

/// Snapshot of the request's [`Current`]; empty outside the tenant layer.
#[derive(Debug, Clone)]
pub struct RequestContext(pub Current);

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestContext(current::snapshot()))
    }
}

/// Declares that a handler needs a resolved tenant.
///
/// Rejects with `TenantNotFound` when the request carries none.
#[derive(Debug, Clone)]
pub struct TenantRequired {
    pub tenant: Arc<Tenant>,
    pub current: Current,
}

impl<S> FromRequestParts<S> for TenantRequired
where
    S: Send + Sync,
{
    type Rejection = DeskAxumError;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = current::snapshot();
        let tenant = Arc::clone(require_tenant(&current)?);
        Ok(TenantRequired { tenant, current })
    }
}
