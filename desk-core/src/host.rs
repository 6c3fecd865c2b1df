//! Host parsing and the tenant route constraint.
//!
//! `acme.example.com` with a TLD length of 1 has the subdomains `["acme"]`;
//! `a.b.example.com` has `["a", "b"]` and resolves to tenant key `a`.
//! IP literals, `localhost` and apex domains have no subdomains.

use crate::tenant::{is_reserved, normalize_subdomain};

/// Largest `tenancy.tld_length` accepted by configuration.
pub const MAX_TLD_LENGTH: usize = 8;

/// Strip the port and any trailing root dot; `None` for IPv6 literals.
fn hostname(host: &str) -> Option<&str> {
    let host = host.trim();
    if host.starts_with('[') {
        return None;
    }
    let name = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    Some(name.trim_end_matches('.'))
}

fn is_ipv4(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.len() <= 3 && p.chars().all(|c| c.is_ascii_digit()))
}

/// All subdomain labels of `host`, leftmost first.
pub fn subdomains(host: &str, tld_length: usize) -> Vec<&str> {
    let Some(name) = hostname(host) else {
        return Vec::new();
    };
    if name.is_empty() || is_ipv4(name) {
        return Vec::new();
    }

    let labels: Vec<&str> = name.split('.').collect();
    let domain_labels = tld_length.saturating_add(1);
    if labels.len() <= domain_labels {
        return Vec::new();
    }
    labels[..labels.len() - domain_labels].to_vec()
}

/// The tenant key for `host`: the leftmost subdomain label, normalized.
///
/// `None` when there is no subdomain or the leftmost label is blank.
pub fn tenant_subdomain(host: &str, tld_length: usize) -> Option<String> {
    subdomains(host, tld_length)
        .first()
        .map(|label| normalize_subdomain(label))
        .filter(|label| !label.is_empty())
}

/// Decides whether a host qualifies for tenant-scoped routes.
///
/// Independent of the tenant directory: it only looks at the host.
#[derive(Debug, Clone, Copy)]
pub struct SubdomainConstraint {
    tld_length: usize,
}

impl Default for SubdomainConstraint {
    fn default() -> Self {
        Self { tld_length: 1 }
    }
}

impl SubdomainConstraint {
    pub fn new(tld_length: usize) -> Self {
        Self { tld_length }
    }

    pub fn tld_length(&self) -> usize {
        self.tld_length
    }

    pub fn matches(&self, host: &str) -> bool {
        match tenant_subdomain(host, self.tld_length) {
            Some(label) => !is_reserved(&label),
            None => false,
        }
    }
}
