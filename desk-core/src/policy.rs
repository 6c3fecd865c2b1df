//! Role/ownership policies, separate from tenant isolation.

use std::sync::Arc;

use crate::current::{Current, CurrentUser};
use crate::errors::{DeskError, DeskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Index,
    Show,
    Create,
    Update,
    Destroy,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::Show => "show",
            Action::Create => "create",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }
}

/// Decides what a user may do with a record. Denies by default.
pub trait Policy<R: ?Sized>: Send + Sync {
    fn permits(&self, _user: Option<&CurrentUser>, _record: &R, _action: Action) -> bool {
        false
    }

    /// Narrow a collection to what the user may list. Keeps everything by
    /// default; tenant isolation has already been applied by the caller.
    fn scope(&self, _user: Option<&CurrentUser>, records: Vec<Arc<R>>) -> Vec<Arc<R>> {
        records
    }
}

/// Baseline policy: nothing is allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationPolicy;

impl<R: ?Sized> Policy<R> for ApplicationPolicy {}

/// `NotAuthorized` unless `policy` permits `action` for the current user.
pub fn authorize<P, R>(policy: &P, current: &Current, record: &R, action: Action) -> DeskResult<()>
where
    P: Policy<R> + ?Sized,
    R: ?Sized,
{
    if policy.permits(current.user(), record, action) {
        return Ok(());
    }
    tracing::debug!(action = action.as_str(), "policy denied action");
    Err(DeskError::not_authorized(format!(
        "not allowed to {} this record",
        action.as_str()
    )))
}

/// Apply `policy`'s scope for the current user.
pub fn policy_scope<P, R>(policy: &P, current: &Current, records: Vec<Arc<R>>) -> Vec<Arc<R>>
where
    P: Policy<R> + ?Sized,
    R: ?Sized,
{
    policy.scope(current.user(), records)
}
