use std::sync::Arc;

use parking_lot::RwLock;

use crate::host::SubdomainConstraint;
use crate::{DeskConfig, DeskConfigSnapshot, TenantStore};

struct DeskAppInner {
    config: RwLock<DeskConfig>,
    tenants: Arc<dyn TenantStore>,
}

/// DeskApp is the shared application container.
///
/// Framework-agnostic. Holds:
/// - config
/// - the tenant directory
pub struct DeskApp {
    inner: Arc<DeskAppInner>,
}

impl Clone for DeskApp {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl DeskApp {
    pub fn new(tenants: Arc<dyn TenantStore>) -> Self {
        Self {
            inner: Arc::new(DeskAppInner {
                config: RwLock::new(DeskConfig::new()),
                tenants,
            }),
        }
    }

    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.config.write().set(key, value);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.config.read().get(key).map(str::to_string)
    }

    /// Mutate the configuration in place (defaults, env overrides).
    pub fn configure<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut DeskConfig) -> T,
    {
        f(&mut self.inner.config.write())
    }

    pub fn config_snapshot(&self) -> DeskConfigSnapshot {
        self.inner.config.read().snapshot()
    }

    pub fn tenants(&self) -> &Arc<dyn TenantStore> {
        &self.inner.tenants
    }

    /// `tenancy.tld_length`, defaulting to 1 (`example.com`).
    pub fn tld_length(&self) -> usize {
        self.inner
            .config
            .read()
            .get("tenancy.tld_length")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1)
    }

    pub fn subdomain_constraint(&self) -> SubdomainConstraint {
        SubdomainConstraint::new(self.tld_length())
    }
}
