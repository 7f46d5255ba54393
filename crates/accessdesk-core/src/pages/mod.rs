//! Page controllers: one per screen of the console.
//!
//! A page composes the [`PolicyApi`](crate::api::PolicyApi) with the
//! [`PolicyForm`](crate::form::PolicyForm). Backend failures never escape a
//! page as panics; they become an error string plus a destructive
//! [`Notice`](crate::notice::Notice).

mod create;
mod detail;
mod list;

pub use create::PolicyCreatePage;
pub use detail::PolicyDetailPage;
pub use list::PolicyListPage;

pub const APPS_ERROR: &str = "Failed to load apps.";
pub const POLICY_ERROR: &str = "Failed to load policy.";

/// Where the console should go after a page action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    PolicyList,
    Stay,
}
