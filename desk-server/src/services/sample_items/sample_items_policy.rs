use desk_core::{Action, CurrentUser, Policy};

use super::SampleItem;

/// Showing is open to anyone on the owning tenant's host; deleting needs an
/// identified user. Tenant isolation is enforced separately by the guard.
pub struct SampleItemPolicy;

impl Policy<SampleItem> for SampleItemPolicy {
    fn permits(&self, user: Option<&CurrentUser>, _record: &SampleItem, action: Action) -> bool {
        match action {
            Action::Show => true,
            Action::Destroy => user.is_some(),
            _ => false,
        }
    }
}
