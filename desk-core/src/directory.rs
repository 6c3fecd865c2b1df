//! Tenant directory: subdomain → tenant lookups.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::DeskResult;
use crate::tenant::{normalize_subdomain, subdomain_invalid, NewTenant, Tenant, TenantId};

/// Storage seam for tenants.
///
/// Request handling only reads through this trait; `create` is the
/// administrative path.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Case-insensitive exact match on the normalized subdomain.
    async fn find_by_subdomain(&self, subdomain: &str) -> DeskResult<Option<Arc<Tenant>>>;

    async fn find(&self, id: TenantId) -> DeskResult<Option<Arc<Tenant>>>;

    /// Normalize, validate and persist a tenant.
    async fn create(&self, tenant: NewTenant) -> DeskResult<Arc<Tenant>>;
}

#[derive(Default)]
struct DirectoryIndex {
    by_id: HashMap<TenantId, Arc<Tenant>>,
    // keyed by normalized subdomain; acts as the unique LOWER(subdomain) index
    by_subdomain: HashMap<String, TenantId>,
}

/// In-process tenant directory.
#[derive(Default)]
pub struct MemoryTenantDirectory {
    index: RwLock<DirectoryIndex>,
    next_id: AtomicU64,
}

impl MemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.index.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TenantStore for MemoryTenantDirectory {
    async fn find_by_subdomain(&self, subdomain: &str) -> DeskResult<Option<Arc<Tenant>>> {
        let key = normalize_subdomain(subdomain);
        let index = self.index.read().await;
        Ok(index
            .by_subdomain
            .get(&key)
            .and_then(|id| index.by_id.get(id))
            .cloned())
    }

    async fn find(&self, id: TenantId) -> DeskResult<Option<Arc<Tenant>>> {
        Ok(self.index.read().await.by_id.get(&id).cloned())
    }

    async fn create(&self, mut tenant: NewTenant) -> DeskResult<Arc<Tenant>> {
        tenant.validate()?;

        let mut index = self.index.write().await;
        if index.by_subdomain.contains_key(&tenant.subdomain) {
            return Err(subdomain_invalid(&["has already been taken"]));
        }

        let id = TenantId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let now = Utc::now();
        let record = Arc::new(Tenant {
            id,
            subdomain: tenant.subdomain,
            name: tenant.name,
            created_at: now,
            updated_at: now,
        });

        index.by_subdomain.insert(record.subdomain.clone(), id);
        index.by_id.insert(id, Arc::clone(&record));

        tracing::info!(tenant_id = %id, subdomain = %record.subdomain, "tenant created");
        Ok(record)
    }
}
