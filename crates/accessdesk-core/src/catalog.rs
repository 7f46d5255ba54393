//! Known integration providers and the targets offered for each step type.
//!
//! Advisory only. Steps with types, targets or providers outside this catalog
//! are still accepted; the backend decides what it can run.

use std::fmt;

use crate::id::generate_id;
use crate::model::IntegrationStep;

/// A value/label pair offered by a picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> CatalogOption {
    CatalogOption { value, label }
}

pub const INTEGRATION_PROVIDERS: &[CatalogOption] = &[
    opt("okta", "Okta"),
    opt("google", "Google Workspace"),
    opt("github", "GitHub"),
    opt("slack", "Slack"),
    opt("azure", "Azure AD"),
];

const PROVISIONING_TYPES: &[CatalogOption] = &[
    opt("add_to_group", "Add to Group"),
    opt("add_permission", "Add Permission"),
    opt("create_account", "Create Account"),
];

const REVOCATION_TYPES: &[CatalogOption] = &[
    opt("remove_from_group", "Remove from Group"),
    opt("remove_permission", "Remove Permission"),
    opt("disable_account", "Disable Account"),
];

const GROUP_TARGETS: &[CatalogOption] = &[
    opt("sales", "Sales"),
    opt("engineering", "Engineering"),
    opt("marketing", "Marketing"),
    opt("finance", "Finance"),
    opt("hr", "Human Resources"),
];

const PERMISSION_TARGETS: &[CatalogOption] = &[
    opt("read", "Read Access"),
    opt("write", "Write Access"),
    opt("admin", "Admin Access"),
    opt("channel_view", "View Channels"),
    opt("channel_post", "Post in Channels"),
];

const ACCOUNT_TARGETS: &[CatalogOption] = &[
    opt("regular", "Regular Account"),
    opt("restricted", "Restricted Account"),
    opt("temporary", "Temporary Account (30 days)"),
    opt("guest", "Guest Account"),
];

const DISABLE_TARGETS: &[CatalogOption] = &[
    opt("temporary", "Temporary Disable"),
    opt("permanent", "Permanent Disable"),
];

/// Which of the two step lists a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Provisioning,
    Revocation,
}

impl StepKind {
    /// Step types offered for this kind, in display order.
    pub fn step_types(&self) -> &'static [CatalogOption] {
        match self {
            Self::Provisioning => PROVISIONING_TYPES,
            Self::Revocation => REVOCATION_TYPES,
        }
    }

    /// Target options for a step type; empty for types outside the catalog.
    pub fn targets(&self, step_type: &str) -> &'static [CatalogOption] {
        match (self, step_type) {
            (Self::Provisioning, "add_to_group") | (Self::Revocation, "remove_from_group") => {
                GROUP_TARGETS
            }
            (Self::Provisioning, "add_permission") | (Self::Revocation, "remove_permission") => {
                PERMISSION_TARGETS
            }
            (Self::Provisioning, "create_account") => ACCOUNT_TARGETS,
            (Self::Revocation, "disable_account") => DISABLE_TARGETS,
            _ => &[],
        }
    }

    /// The step a brand-new draft starts with.
    pub fn initial_step(&self) -> IntegrationStep {
        match self {
            Self::Provisioning => {
                self.step_with_description("add_to_group", "Add user to Sales group in Okta")
            }
            Self::Revocation => self
                .step_with_description("remove_from_group", "Remove user from Sales group in Okta"),
        }
    }

    /// The step appended by "add step".
    pub fn new_step(&self) -> IntegrationStep {
        match self {
            Self::Provisioning => self.step_with_description("add_to_group", "Add user to group"),
            Self::Revocation => {
                self.step_with_description("remove_from_group", "Remove user from group")
            }
        }
    }

    fn step_with_description(&self, step_type: &str, description: &str) -> IntegrationStep {
        IntegrationStep {
            id: generate_id(),
            step_type: step_type.to_string(),
            target: "sales".to_string(),
            provider: "okta".to_string(),
            description: Some(description.to_string()),
            ..IntegrationStep::default()
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provisioning => f.write_str("provisioning"),
            Self::Revocation => f.write_str("revocation"),
        }
    }
}

pub fn provider_label(value: &str) -> Option<&'static str> {
    INTEGRATION_PROVIDERS
        .iter()
        .find(|p| p.value == value)
        .map(|p| p.label)
}
