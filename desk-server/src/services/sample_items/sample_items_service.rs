use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use desk_core::{DeskError, DeskResult, TenantId, TenantOwned};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

/// Stand-in for any tenant-owned record. The owner is fixed at creation.
#[derive(Debug, Clone, Serialize)]
pub struct SampleItem {
    pub id: u64,
    pub tenant_id: TenantId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SampleItem {
    /// Public representation: `{"id", "name", "tenant_id"}`.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "tenant_id": self.tenant_id,
        })
    }
}

impl TenantOwned for SampleItem {
    fn owning_tenant(&self) -> TenantId {
        self.tenant_id
    }
}

#[derive(Default)]
pub struct SampleItemsService {
    items: RwLock<HashMap<u64, Arc<SampleItem>>>,
    next_id: AtomicU64,
}

impl SampleItemsService {
    pub async fn create(&self, tenant_id: TenantId, name: &str) -> DeskResult<Arc<SampleItem>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DeskError::unprocessable("Validation failed: Name can't be blank")
                .with_errors(json!({"name": ["can't be blank"]})));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let now = Utc::now();
        let item = Arc::new(SampleItem {
            id,
            tenant_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        });

        self.items.write().await.insert(id, Arc::clone(&item));
        tracing::debug!(item_id = id, tenant_id = %tenant_id, "sample item created");
        Ok(item)
    }

    /// Global lookup by primary key; callers must run the ownership guard.
    pub async fn find(&self, id: u64) -> Option<Arc<SampleItem>> {
        self.items.read().await.get(&id).cloned()
    }

    /// Items owned by `tenant_id`, oldest first.
    pub async fn list_for(&self, tenant_id: TenantId) -> Vec<Arc<SampleItem>> {
        let items = self.items.read().await;
        let mut owned: Vec<_> = items
            .values()
            .filter(|item| item.tenant_id == tenant_id)
            .cloned()
            .collect();
        owned.sort_by_key(|item| item.id);
        owned
    }

    pub async fn remove(&self, id: u64) -> Option<Arc<SampleItem>> {
        self.items.write().await.remove(&id)
    }
}
