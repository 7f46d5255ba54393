use tracing::error;

use crate::api::PolicyApi;
use crate::error::{FormError, SubmitError};
use crate::form::PolicyForm;
use crate::model::{App, Policy};
use crate::notice::{Notice, Notices};

use super::{APPS_ERROR, Navigation, POLICY_ERROR};

/// One policy, read-only until edit mode is entered.
#[derive(Debug)]
pub struct PolicyDetailPage {
    id: String,
    policy: Option<Policy>,
    apps: Vec<App>,
    form: Option<PolicyForm>,
    editing: bool,
    error: Option<String>,
    notices: Notices,
}

impl PolicyDetailPage {
    /// Loads the policy, then the app list, then the form's reference data.
    ///
    /// A missing policy leaves the page empty; a missing app list only
    /// empties the app selector.
    pub async fn open(api: &dyn PolicyApi, id: &str) -> Self {
        let mut page = Self {
            id: id.to_string(),
            policy: None,
            apps: Vec::new(),
            form: None,
            editing: false,
            error: None,
            notices: Notices::default(),
        };

        if id.is_empty() {
            page.error = Some("Policy ID is missing".to_string());
            return page;
        }

        let policy = match api.get_policy(id).await {
            Ok(policy) => policy,
            Err(e) => {
                error!(error = %e, policy_id = id, "Error loading policy");
                page.notices.push(Notice::error(POLICY_ERROR));
                page.error = Some(e.to_string());
                return page;
            }
        };

        page.apps = match api.list_apps().await {
            Ok(apps) => apps,
            Err(e) => {
                error!(error = %e, "Error loading apps");
                page.notices.push(Notice::error(APPS_ERROR));
                Vec::new()
            }
        };

        page.form = Some(PolicyForm::load(api, page.apps.clone(), Some(policy.clone()), true).await);
        page.policy = Some(policy);
        page
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    pub fn form(&self) -> Option<&PolicyForm> {
        self.form.as_ref()
    }

    /// The form, only while in edit mode.
    pub fn form_mut(&mut self) -> Option<&mut PolicyForm> {
        if self.editing {
            self.form.as_mut()
        } else {
            None
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn begin_edit(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.set_read_only(false);
            self.editing = true;
        }
    }

    /// Leaves edit mode and discards the draft.
    pub fn cancel_edit(&mut self) {
        self.editing = false;
        self.rebuild_form();
    }

    /// Validates the draft and updates the policy.
    ///
    /// On success the page shows the backend's copy and leaves edit mode.
    pub async fn submit(&mut self, api: &dyn PolicyApi) -> Result<Navigation, SubmitError> {
        if !self.editing {
            return Err(FormError::ReadOnly.into());
        }
        let Some(form) = self.form.as_mut() else {
            return Err(FormError::ReadOnly.into());
        };
        self.error = None;
        let id = self.id.as_str();
        let result = form
            .submit(|payload| async move { api.update_policy(id, &payload).await })
            .await;
        match result {
            Ok(updated) => {
                self.notices.push(Notice::success("Policy updated successfully"));
                self.policy = Some(updated);
                self.editing = false;
                self.rebuild_form();
                Ok(Navigation::Stay)
            }
            Err(SubmitError::Rejected(e)) => {
                let message = e.to_string();
                self.notices.push(Notice::error(message.clone()));
                self.error = Some(message);
                Err(SubmitError::Rejected(e))
            }
            Err(invalid) => Err(invalid),
        }
    }

    fn rebuild_form(&mut self) {
        let Some(policy) = self.policy.clone() else {
            return;
        };
        let mut form = PolicyForm::new(self.apps.clone(), Some(policy), !self.editing);
        if let Some(previous) = self.form.as_ref() {
            form.set_reference_data(previous.all_users().to_vec(), previous.all_groups().to_vec());
        }
        self.form = Some(form);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
