//! # Configuration
//!
//! A minimal string key/value store, layered by the application:
//! defaults first, then environment overrides.
//!
//! ```rust
//! use desk_core::DeskConfig;
//! let mut config = DeskConfig::new();
//!
//! config.set("http.port", "3000");
//! config.set("tenancy.tld_length", "1");
//!
//! assert_eq!(config.get("http.port"), Some("3000"));
//! assert_eq!(config.snapshot().get_usize("tenancy.tld_length"), Some(1));
//! ```
//!
//! Environment variables with a prefix override keys, `__` separating
//! segments: `WHISPERDESK__HTTP__PORT=8080` becomes `http.port`.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DeskConfig {
    values: HashMap<String, String>,
}

impl DeskConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Set a key only if it has no value yet.
    pub fn set_default<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Apply every `PREFIX…` variable from the process environment.
    ///
    /// Returns the number of keys overridden.
    pub fn load_env(&mut self, prefix: &str) -> usize {
        self.load_vars(prefix, std::env::vars())
    }

    /// Same as [`DeskConfig::load_env`] over an explicit variable list.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped
                    .trim_start_matches('_')
                    .to_lowercase()
                    .replace("__", ".");
                if normalized.is_empty() {
                    continue;
                }
                tracing::debug!(key = %normalized, "config override from environment");
                self.set(normalized, value);
                applied += 1;
            }
        }
        applied
    }

    pub fn snapshot(&self) -> DeskConfigSnapshot {
        DeskConfigSnapshot::new(self.values.clone())
    }
}

/// Immutable copy of the configuration with typed getters.
#[derive(Debug, Clone, Default)]
pub struct DeskConfigSnapshot {
    map: HashMap<String, String>,
}

impl DeskConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }

    /// Comma-separated list; blank entries are skipped.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
