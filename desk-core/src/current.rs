//! Request-scoped context.
//!
//! A [`Current`] lives for exactly one request. The resolution middleware
//! installs it with [`scope`] around the downstream future; code running
//! inside that future reads it with [`snapshot`]. Outside a scope the
//! context reads as empty, so nothing leaks into a later request that
//! reuses the same worker thread or task.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use crate::errors::{DeskError, DeskResult};
use crate::tenant::{Tenant, TenantId};

tokio::task_local! {
    static CURRENT: RefCell<Current>;
}

/// Opaque identity of the acting user, supplied by an upstream auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrentUser(pub String);

/// Per-request state: resolved tenant, acting user and request id.
#[derive(Debug, Clone, Default)]
pub struct Current {
    tenant: Option<Arc<Tenant>>,
    user: Option<CurrentUser>,
    request_id: Option<String>,
}

impl Current {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant(mut self, tenant: Arc<Tenant>) -> Self {
        self.tenant = Some(tenant);
        self
    }

    pub fn with_user(mut self, user: CurrentUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Populate the tenant. A request resolves its tenant at most once.
    pub fn set_tenant(&mut self, tenant: Arc<Tenant>) -> DeskResult<()> {
        if let Some(existing) = &self.tenant {
            return Err(DeskError::general_error(format!(
                "tenant already resolved for this request: {}",
                existing.subdomain
            )));
        }
        self.tenant = Some(tenant);
        Ok(())
    }

    pub fn tenant(&self) -> Option<&Arc<Tenant>> {
        self.tenant.as_ref()
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant.as_ref().map(|t| t.id)
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.tenant.is_none() && self.user.is_none() && self.request_id.is_none()
    }

    /// Clear every attribute.
    pub fn reset(&mut self) {
        self.tenant = None;
        self.user = None;
        self.request_id = None;
    }
}

// Runs inside the task-local scope, so it fires on completion, on early
// drop of the request future and while unwinding.
struct ResetOnExit;

impl Drop for ResetOnExit {
    fn drop(&mut self) {
        let _ = CURRENT.try_with(|cell| {
            if let Ok(mut current) = cell.try_borrow_mut() {
                current.reset();
            }
        });
        tracing::trace!("request context reset");
    }
}

/// Run `fut` with `current` as its request context.
pub async fn scope<F>(current: Current, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT
        .scope(RefCell::new(current), async move {
            let _reset = ResetOnExit;
            fut.await
        })
        .await
}

/// A copy of the active request context, or an empty one outside a request.
pub fn snapshot() -> Current {
    CURRENT
        .try_with(|cell| cell.borrow().clone())
        .unwrap_or_default()
}

/// Whether the caller is running inside a request scope.
pub fn is_active() -> bool {
    CURRENT.try_with(|_| ()).is_ok()
}
