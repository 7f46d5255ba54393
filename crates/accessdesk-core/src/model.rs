//! Records exchanged with the policy backend.
//!
//! Every type here mirrors the JSON the backend speaks: camelCase field names,
//! optional lists omitted when absent. The console never creates users, groups
//! or apps; it only references them by id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// How long granted access lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessDurationType {
    /// Access never expires.
    #[default]
    Indefinite,
    /// Access expires after `accessDurationDays`.
    Fixed,
    /// The requester picks a duration between `minDays` and `maxDays`.
    UserRequested,
}

impl AccessDurationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indefinite => "INDEFINITE",
            Self::Fixed => "FIXED",
            Self::UserRequested => "USER_REQUESTED",
        }
    }
}

impl fmt::Display for AccessDurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessDurationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "INDEFINITE" => Ok(Self::Indefinite),
            "FIXED" => Ok(Self::Fixed),
            "USER_REQUESTED" => Ok(Self::UserRequested),
            other => Err(format!(
                "unknown access duration \"{other}\" (expected INDEFINITE, FIXED or USER_REQUESTED)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Backend fields not modelled here, such as timestamps; kept for round trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// A user known only by id, used when a reviewer is missing from the reference list.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// "First Last", falling back to the email when both names are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    /// Whether every identifying field is filled in.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty()
            && !self.email.is_empty()
            && !self.first_name.is_empty()
            && !self.last_name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Backend fields not modelled here, such as timestamps or notes; kept for round trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Group {
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl App {
    /// Placeholder for an app id that is not in the loaded app list.
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "Unknown App".to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStepType {
    /// The owner of the policy's app approves.
    #[default]
    AppOwner,
    /// One of an explicit list of users approves.
    Specific,
}

impl fmt::Display for ApprovalStepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppOwner => f.write_str("app_owner"),
            Self::Specific => f.write_str("specific"),
        }
    }
}

impl FromStr for ApprovalStepType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "app_owner" | "app-owner" => Ok(Self::AppOwner),
            "specific" => Ok(Self::Specific),
            other => Err(format!(
                "unknown approval step type \"{other}\" (expected app_owner or specific)"
            )),
        }
    }
}

/// One stage of the sequential approval chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStep {
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: ApprovalStepType,
    #[serde(default)]
    pub escalate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<Vec<String>>,
}

/// A declarative instruction the backend runs against an external provider
/// when access is granted or revoked.
///
/// Type, target and provider are free-form; nothing checks that they make
/// sense together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStep {
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub type ProvisioningStep = IntegrationStep;
pub type RevocationStep = IntegrationStep;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<App>,

    #[serde(default)]
    pub visible_to_everyone: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_groups: Option<Vec<Group>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_users: Option<Vec<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_group_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_user_ids: Option<Vec<String>>,

    #[serde(default)]
    pub access_duration_type: AccessDurationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_duration_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_reason: Option<bool>,

    #[serde(default = "default_true")]
    pub use_app_owner_as_reviewer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_steps: Option<Vec<ApprovalStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_steps: Option<Vec<ProvisioningStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_steps: Option<Vec<RevocationStep>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub deleted_at: Option<OffsetDateTime>,

    /// Backend fields this console does not model; carried through updates untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: None,
            app_id: String::new(),
            app: None,
            visible_to_everyone: false,
            visible_groups: None,
            visible_users: None,
            visible_group_ids: None,
            visible_user_ids: None,
            access_duration_type: AccessDurationType::default(),
            access_duration_days: None,
            min_days: None,
            max_days: None,
            require_reason: None,
            use_app_owner_as_reviewer: true,
            reviewers: None,
            reviewer_ids: None,
            approval_steps: None,
            provisioning_steps: None,
            revocation_steps: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
            extra: Map::new(),
        }
    }
}

impl Policy {
    /// Reviewer ids, preferring the expanded `reviewers` list over `reviewerIds`.
    pub fn reviewer_id_list(&self) -> Vec<String> {
        match (&self.reviewers, &self.reviewer_ids) {
            (Some(reviewers), _) => reviewers.iter().map(|r| r.id.clone()).collect(),
            (None, Some(ids)) => ids.clone(),
            (None, None) => Vec::new(),
        }
    }

    /// Short, human readable access duration, as shown on a policy card.
    pub fn duration_summary(&self) -> String {
        match self.access_duration_type {
            AccessDurationType::Indefinite => "Indefinite access".to_string(),
            AccessDurationType::Fixed => match self.access_duration_days {
                Some(days) => format!("{days} days access"),
                None => "Fixed access".to_string(),
            },
            AccessDurationType::UserRequested => match (self.min_days, self.max_days) {
                (Some(min), Some(max)) => format!("User requested access ({min}-{max} days)"),
                _ => "User requested access".to_string(),
            },
        }
    }
}

/// Settings sent to `/integrations/test` alongside the provider and step type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConfig {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

impl From<&IntegrationStep> for IntegrationConfig {
    fn from(step: &IntegrationStep) -> Self {
        Self {
            target: step.target.clone(),
            parameters: step.parameters.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationTestResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
