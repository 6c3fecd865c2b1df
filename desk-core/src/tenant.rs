//! Tenant records and subdomain rules.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{DeskError, DeskResult};

/// Subdomain labels that can never name a tenant nor match tenant routes.
pub const RESERVED_SUBDOMAINS: &[&str] = &["www", "admin", "api", "billing"];

/// Tenant primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub u64);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical form of a subdomain: trimmed and lowercased.
///
/// Idempotent, so it is safe to apply before every validation.
pub fn normalize_subdomain(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Exact membership test against [`RESERVED_SUBDOMAINS`]; callers normalize first.
pub fn is_reserved(label: &str) -> bool {
    RESERVED_SUBDOMAINS.contains(&label)
}

/// A persisted tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tenant {
    pub id: TenantId,
    pub subdomain: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for creating a tenant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTenant {
    pub subdomain: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl NewTenant {
    pub fn new(subdomain: impl Into<String>) -> Self {
        Self {
            subdomain: subdomain.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn normalize(&mut self) {
        self.subdomain = normalize_subdomain(&self.subdomain);
    }

    /// Normalizes, then checks presence and the reserved list.
    ///
    /// Uniqueness needs the directory and is checked there.
    pub fn validate(&mut self) -> DeskResult<()> {
        self.normalize();

        let mut messages = Vec::new();
        if self.subdomain.is_empty() {
            messages.push("can't be blank");
        } else if is_reserved(&self.subdomain) {
            messages.push("is reserved");
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(subdomain_invalid(&messages))
        }
    }
}

/// `Unprocessable` error carrying `{"subdomain": [..messages]}`.
pub(crate) fn subdomain_invalid(messages: &[&str]) -> DeskError {
    let summary = messages
        .iter()
        .map(|m| format!("Subdomain {m}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut errors = Map::new();
    errors.insert(
        "subdomain".to_string(),
        Value::Array(messages.iter().map(|m| Value::String(m.to_string())).collect()),
    );

    DeskError::unprocessable(format!("Validation failed: {summary}")).with_errors(Value::Object(errors))
}
