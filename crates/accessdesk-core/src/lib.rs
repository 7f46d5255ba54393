//! # accessdesk-core
//!
//! Headless model of the AccessDesk policy console.
//!
//! ## Overview
//!
//! - [`model`] - policy, approval/integration steps, users, groups and apps
//!   as the backend serializes them
//! - [`PolicyApi`] - the backend contract, one async method per endpoint
//! - [`PolicyForm`] - draft state, shallow validation and payload assembly
//! - [`UserContext`] - the "acting as" identity threaded into the policy list
//! - [`pages`] - list, create and detail screens composing the two
//!
//! ## Example
//!
//! ```ignore
//! use accessdesk_core::prelude::*;
//!
//! async fn rename(api: &dyn PolicyApi, id: &str) -> Result<(), SubmitError> {
//!     let mut page = PolicyDetailPage::open(api, id).await;
//!     page.begin_edit();
//!     if let Some(form) = page.form_mut() {
//!         form.set_name("Renamed");
//!     }
//!     page.submit(api).await.map(|_| ())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod context;
mod error;
pub mod form;
mod id;
pub mod model;
pub mod notice;
pub mod pages;

pub use api::PolicyApi;
pub use catalog::{CatalogOption, INTEGRATION_PROVIDERS, StepKind};
pub use context::{DEFAULT_ADMIN_EMAIL, UserContext};
pub use error::{ApiError, ApiResult, FormError, SubmitError};
pub use form::{ApprovalDraft, PolicyForm, StepField, Visibility};
pub use id::generate_id;
pub use model::{
    AccessDurationType, App, ApprovalStep, ApprovalStepType, Group, IntegrationConfig,
    IntegrationStep, IntegrationTestResult, Policy, ProvisioningStep, RevocationStep, User,
};
pub use notice::{Notice, NoticeVariant, Notices};
pub use pages::{Navigation, PolicyCreatePage, PolicyDetailPage, PolicyListPage};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::api::PolicyApi;
    pub use crate::catalog::StepKind;
    pub use crate::context::UserContext;
    pub use crate::error::{ApiError, ApiResult, FormError, SubmitError};
    pub use crate::form::{PolicyForm, StepField, Visibility};
    pub use crate::model::{
        AccessDurationType, App, ApprovalStep, ApprovalStepType, Group, IntegrationStep, Policy,
        User,
    };
    pub use crate::notice::{Notice, Notices};
    pub use crate::pages::{Navigation, PolicyCreatePage, PolicyDetailPage, PolicyListPage};
}
