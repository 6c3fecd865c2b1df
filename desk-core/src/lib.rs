//! desk-core: framework-agnostic tenancy core for WhisperDesk.
//!
//! Tenants are addressed by subdomain. Every request gets its own
//! [`Current`] context, handlers check ownership with [`assert_tenant`],
//! and route groups are gated by [`SubdomainConstraint`].

pub mod app;
pub mod config;
pub mod current;
pub mod directory;
pub mod errors;
pub mod guard;
pub mod host;
pub mod policy;
pub mod tenant;

pub use app::DeskApp;
pub use config::{DeskConfig, DeskConfigSnapshot};
pub use current::{Current, CurrentUser};
pub use directory::{MemoryTenantDirectory, TenantStore};
pub use errors::{DeskError, DeskResult, ErrorKind};
pub use guard::{assert_tenant, require_tenant, TenantOwned};
pub use host::{subdomains, tenant_subdomain, SubdomainConstraint, MAX_TLD_LENGTH};
pub use policy::{authorize, policy_scope, Action, ApplicationPolicy, Policy};
pub use tenant::{is_reserved, normalize_subdomain, NewTenant, Tenant, TenantId, RESERVED_SUBDOMAINS};
