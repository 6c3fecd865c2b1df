//! Tenant ownership checks.
//!
//! Handlers that load a tenant-owned record outside a tenant-scoped query
//! (e.g. a lookup by primary key) must pass it through [`assert_tenant`]
//! before using it. The check is fail-closed.

use std::sync::Arc;

use crate::current::Current;
use crate::errors::{DeskError, DeskResult};
use crate::tenant::{Tenant, TenantId};

/// Anything that belongs to exactly one tenant.
pub trait TenantOwned {
    fn owning_tenant(&self) -> TenantId;
}

impl<T: TenantOwned + ?Sized> TenantOwned for Arc<T> {
    fn owning_tenant(&self) -> TenantId {
        (**self).owning_tenant()
    }
}

/// Deny unless `resource` exists and belongs to the current tenant.
///
/// Returns the verified resource.
pub fn assert_tenant<'a, R>(resource: Option<&'a R>, current: &Current) -> DeskResult<&'a R>
where
    R: TenantOwned + ?Sized,
{
    let Some(resource) = resource else {
        return Err(DeskError::access_denied("resource not found"));
    };

    match current.tenant_id() {
        Some(tenant_id) if tenant_id == resource.owning_tenant() => Ok(resource),
        Some(tenant_id) => {
            tracing::warn!(
                current_tenant = %tenant_id,
                owning_tenant = %resource.owning_tenant(),
                "cross-tenant access denied"
            );
            Err(DeskError::access_denied("resource belongs to another tenant"))
        }
        None => Err(DeskError::access_denied("no tenant resolved for this request")),
    }
}

/// The resolved tenant, or `TenantNotFound` for handlers reached without one.
pub fn require_tenant(current: &Current) -> DeskResult<&Arc<Tenant>> {
    current
        .tenant()
        .ok_or_else(|| DeskError::tenant_not_found("this route requires a tenant"))
}
