//! Draft state for creating or editing a policy.
//!
//! [`PolicyForm`] owns one value per editable field plus the three step
//! lists. Sections of the form live in submodules:
//!
//! - [`visibility`] - who can see the policy (everyone or picked groups/users)
//! - [`approval`] - reviewer pool and the approval chain
//! - [`steps`] - provisioning and revocation steps
//!
//! Every mutator is a no-op while the form is read-only. Validation is
//! shallow and local: it never contacts the backend.

pub mod approval;
pub mod steps;
pub mod visibility;

use std::future::Future;

use futures_util::future::try_join;
use tracing::{debug, error, warn};

use crate::api::PolicyApi;
use crate::catalog::StepKind;
use crate::error::{ApiResult, FormError, SubmitError};
use crate::id::generate_id;
use crate::model::{AccessDurationType, App, Group, IntegrationStep, Policy, User};

pub use approval::ApprovalDraft;
pub use steps::StepField;
pub use visibility::Visibility;

pub const DEFAULT_DURATION_DAYS: u32 = 30;
pub const DEFAULT_MIN_DAYS: u32 = 1;
pub const DEFAULT_MAX_DAYS: u32 = 90;

/// Shown when the reviewer/visibility reference lists could not be fetched.
pub const RESOURCE_ERROR: &str = "Failed to load necessary resources.";

#[derive(Debug, Clone)]
pub struct PolicyForm {
    apps: Vec<App>,
    original: Option<Policy>,
    read_only: bool,

    name: String,
    description: String,
    app_id: String,

    visibility: Visibility,
    selected_groups: Vec<Option<Group>>,
    selected_users: Vec<Option<User>>,

    duration_type: AccessDurationType,
    duration_days: u32,
    min_days: u32,
    max_days: u32,
    require_reason: Option<bool>,

    use_app_owner_as_reviewer: bool,
    reviewer_ids: Vec<String>,
    approval_steps: Vec<ApprovalDraft>,
    provisioning_steps: Vec<IntegrationStep>,
    revocation_steps: Vec<IntegrationStep>,

    all_users: Vec<User>,
    all_groups: Vec<Group>,
    resource_error: Option<String>,
    error: Option<String>,
    submitting: bool,
}

impl PolicyForm {
    /// Builds a draft from an optional existing policy, without reference data.
    ///
    /// With no initial policy the draft starts from the defaults of a new
    /// policy: first app selected, one provisioning and one revocation step.
    pub fn new(apps: Vec<App>, initial: Option<Policy>, read_only: bool) -> Self {
        let is_new = initial.is_none();
        let seed = initial.clone().unwrap_or_default();

        let app_id = if seed.app_id.is_empty() {
            apps.first().map(|a| a.id.clone()).unwrap_or_default()
        } else {
            seed.app_id.clone()
        };

        let visibility = if seed.visible_to_everyone {
            Visibility::Everyone
        } else {
            Visibility::Specific
        };

        let selected_groups = match (&seed.visible_groups, &seed.visible_group_ids) {
            (Some(groups), _) => groups.iter().cloned().map(Some).collect(),
            (None, Some(ids)) => ids
                .iter()
                .map(|id| {
                    Some(Group {
                        id: id.clone(),
                        ..Group::default()
                    })
                })
                .collect(),
            (None, None) => Vec::new(),
        };
        let selected_users = match (&seed.visible_users, &seed.visible_user_ids) {
            (Some(users), _) => users.iter().cloned().map(Some).collect(),
            (None, Some(ids)) => ids.iter().map(|id| Some(User::with_id(id.clone()))).collect(),
            (None, None) => Vec::new(),
        };

        let reviewer_ids = seed.reviewer_id_list();
        let approval_steps = seed
            .approval_steps
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(ApprovalDraft::from_step)
            .collect();

        Self {
            name: seed.name.clone(),
            description: seed.description.clone().unwrap_or_default(),
            app_id,
            visibility,
            selected_groups,
            selected_users,
            duration_type: seed.access_duration_type,
            duration_days: seed
                .access_duration_days
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_DURATION_DAYS),
            min_days: seed.min_days.filter(|d| *d > 0).unwrap_or(DEFAULT_MIN_DAYS),
            max_days: seed.max_days.filter(|d| *d > 0).unwrap_or(DEFAULT_MAX_DAYS),
            require_reason: seed.require_reason,
            use_app_owner_as_reviewer: seed.use_app_owner_as_reviewer,
            reviewer_ids,
            approval_steps,
            provisioning_steps: seed
                .provisioning_steps
                .unwrap_or_else(|| starting_steps(StepKind::Provisioning, is_new)),
            revocation_steps: seed
                .revocation_steps
                .unwrap_or_else(|| starting_steps(StepKind::Revocation, is_new)),
            all_users: Vec::new(),
            all_groups: Vec::new(),
            resource_error: None,
            error: None,
            submitting: false,
            apps,
            original: initial,
            read_only,
        }
    }

    /// Builds the draft and fetches users and groups concurrently.
    ///
    /// A failed fetch leaves both reference lists empty and records
    /// [`RESOURCE_ERROR`]; the form stays usable.
    pub async fn load(
        api: &dyn PolicyApi,
        apps: Vec<App>,
        initial: Option<Policy>,
        read_only: bool,
    ) -> Self {
        let mut form = Self::new(apps, initial, read_only);
        match try_join(api.list_users(), api.list_groups()).await {
            Ok((users, groups)) => form.set_reference_data(users, groups),
            Err(e) => {
                error!(error = %e, "Error fetching users or groups");
                form.resource_error = Some(RESOURCE_ERROR.to_string());
            }
        }
        form
    }

    /// Installs the reference lists and fills in visibility rows known only by id.
    pub fn set_reference_data(&mut self, users: Vec<User>, groups: Vec<Group>) {
        self.all_users = users;
        self.all_groups = groups;
        self.resource_error = None;
        self.hydrate_selections();
    }

    pub(crate) fn editable(&self) -> bool {
        if self.read_only {
            debug!("ignoring edit on read-only policy form");
        }
        !self.read_only
    }

    // ---- metadata section ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.editable() {
            self.name = name.into();
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        if self.editable() {
            self.description = description.into();
        }
    }

    // ---- app selector ----

    pub fn apps(&self) -> &[App] {
        &self.apps
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn select_app(&mut self, app_id: impl Into<String>) {
        if self.editable() {
            self.app_id = app_id.into();
        }
    }

    // ---- access duration ----

    pub fn duration_type(&self) -> AccessDurationType {
        self.duration_type
    }

    pub fn set_duration_type(&mut self, duration_type: AccessDurationType) {
        if self.editable() {
            self.duration_type = duration_type;
        }
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn set_duration_days(&mut self, days: u32) {
        if self.editable() {
            self.duration_days = days;
        }
    }

    pub fn min_days(&self) -> u32 {
        self.min_days
    }

    pub fn set_min_days(&mut self, days: u32) {
        if self.editable() {
            self.min_days = days;
        }
    }

    pub fn max_days(&self) -> u32 {
        self.max_days
    }

    pub fn set_max_days(&mut self, days: u32) {
        if self.editable() {
            self.max_days = days;
        }
    }

    pub fn require_reason(&self) -> bool {
        self.require_reason.unwrap_or(false)
    }

    pub fn set_require_reason(&mut self, require: bool) {
        if self.editable() {
            self.require_reason = Some(require);
        }
    }

    // ---- form status ----

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Whether this draft edits an existing policy rather than creating one.
    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Save Changes"
        } else {
            "Create Policy"
        }
    }

    pub fn all_users(&self) -> &[User] {
        &self.all_users
    }

    pub fn all_groups(&self) -> &[Group] {
        &self.all_groups
    }

    pub fn resource_error(&self) -> Option<&str> {
        self.resource_error.as_deref()
    }

    /// Last validation error raised by a submit attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    // ---- validation & payload ----

    /// Presence and positivity checks only; no cross-field consistency rules.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() || self.app_id.is_empty() {
            return Err(FormError::MissingRequiredFields);
        }
        match self.duration_type {
            AccessDurationType::Fixed if self.duration_days == 0 => {
                Err(FormError::InvalidFixedDuration)
            }
            AccessDurationType::UserRequested
                if self.min_days == 0 || self.max_days == 0 || self.min_days > self.max_days =>
            {
                Err(FormError::InvalidRequestedRange)
            }
            _ => Ok(()),
        }
    }

    /// Validates and assembles the full policy payload.
    ///
    /// Fields the form does not edit are carried over from the original record,
    /// and an untouched edit reproduces the record it was loaded from.
    pub fn build_payload(&self) -> Result<Policy, FormError> {
        self.validate()?;

        let original = self.original.as_ref();
        let mut policy = original.cloned().unwrap_or_default();
        if policy.id.is_empty() {
            policy.id = generate_id();
        }

        policy.name = self.name.clone();
        policy.description = if self.description.is_empty() {
            policy.description.take().filter(|d| d.is_empty())
        } else {
            Some(self.description.clone())
        };

        if original.is_none_or(|p| p.app_id != self.app_id) {
            policy.app = Some(
                self.apps
                    .iter()
                    .find(|a| a.id == self.app_id)
                    .cloned()
                    .unwrap_or_else(|| App::unknown(self.app_id.clone())),
            );
        }
        policy.app_id = self.app_id.clone();

        self.apply_visibility(&mut policy);

        // Switching variants drops the fields of the old one.
        if original.is_none_or(|p| p.access_duration_type != self.duration_type) {
            policy.access_duration_days = None;
            policy.min_days = None;
            policy.max_days = None;
            policy.require_reason = None;
        }
        policy.access_duration_type = self.duration_type;
        match self.duration_type {
            AccessDurationType::Fixed => policy.access_duration_days = Some(self.duration_days),
            AccessDurationType::UserRequested => {
                policy.min_days = Some(self.min_days);
                policy.max_days = Some(self.max_days);
                policy.require_reason = self.require_reason;
            }
            AccessDurationType::Indefinite => {}
        }

        self.apply_approvals(&mut policy);

        policy.provisioning_steps = carry_list(
            self.carried(|p| p.provisioning_steps.is_some()),
            self.provisioning_steps.clone(),
        );
        policy.revocation_steps = carry_list(
            self.carried(|p| p.revocation_steps.is_some()),
            self.revocation_steps.clone(),
        );

        Ok(policy)
    }

    /// Applies `has` to the original record; `None` for a new draft.
    fn carried<T>(&self, has: impl Fn(&Policy) -> T) -> Option<T> {
        self.original.as_ref().map(has)
    }

    /// Validates the draft and records the outcome as the form's error value.
    pub fn prepare_submit(&mut self) -> Result<Policy, FormError> {
        if self.read_only {
            return Err(FormError::ReadOnly);
        }
        match self.build_payload() {
            Ok(policy) => {
                self.error = None;
                Ok(policy)
            }
            Err(e) => {
                warn!(error = %e, "policy form validation failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Validates, then hands the payload to `on_submit`.
    ///
    /// Validation failures never reach the callback.
    pub async fn submit<F, Fut, T>(&mut self, on_submit: F) -> Result<T, SubmitError>
    where
        F: FnOnce(Policy) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let payload = self.prepare_submit()?;
        self.submitting = true;
        let result = on_submit(payload).await;
        self.submitting = false;
        result.map_err(SubmitError::from)
    }
}

fn starting_steps(kind: StepKind, is_new: bool) -> Vec<IntegrationStep> {
    if is_new {
        vec![kind.initial_step()]
    } else {
        Vec::new()
    }
}

/// Which of a paired object list and id list go into the payload, as `(objects, ids)`.
///
/// New drafts send both. Edits send the lists the record already carried, or
/// both when it carried neither and something has been picked since.
fn list_shape(carried: Option<(bool, bool)>, picked: bool) -> (bool, bool) {
    match carried {
        None => (true, true),
        Some((false, false)) => (picked, picked),
        Some(shape) => shape,
    }
}

/// Keeps a list absent on records that never carried it until it gains an entry.
fn carry_list<T>(carried: Option<bool>, items: Vec<T>) -> Option<Vec<T>> {
    match carried {
        Some(false) if items.is_empty() => None,
        _ => Some(items),
    }
}
