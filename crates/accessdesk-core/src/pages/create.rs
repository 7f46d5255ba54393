use tracing::error;

use crate::api::PolicyApi;
use crate::error::SubmitError;
use crate::form::PolicyForm;
use crate::model::Policy;
use crate::notice::{Notice, Notices};

use super::{APPS_ERROR, Navigation};

/// New-policy screen: an editable form over the app list.
#[derive(Debug)]
pub struct PolicyCreatePage {
    form: PolicyForm,
    error: Option<String>,
    created: Option<Policy>,
    notices: Notices,
}

impl PolicyCreatePage {
    /// Loads apps, then the form's reference data.
    ///
    /// Without apps the form still opens, with nothing selected.
    pub async fn open(api: &dyn PolicyApi) -> Self {
        let mut notices = Notices::default();
        let mut page_error = None;
        let apps = match api.list_apps().await {
            Ok(apps) => apps,
            Err(e) => {
                error!(error = %e, "Error loading apps");
                notices.push(Notice::error(APPS_ERROR));
                page_error = Some(e.to_string());
                Vec::new()
            }
        };
        let form = PolicyForm::load(api, apps, None, false).await;
        Self {
            form,
            error: page_error,
            created: None,
            notices,
        }
    }

    pub fn form(&self) -> &PolicyForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PolicyForm {
        &mut self.form
    }

    /// Validates the draft and creates the policy.
    ///
    /// On success the console navigates back to the list.
    pub async fn submit(&mut self, api: &dyn PolicyApi) -> Result<Navigation, SubmitError> {
        self.error = None;
        let result = self
            .form
            .submit(|payload| async move { api.create_policy(&payload).await })
            .await;
        match result {
            Ok(created) => {
                self.notices.push(Notice::success("Policy created successfully"));
                self.created = Some(created);
                Ok(Navigation::PolicyList)
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

    /// The policy as returned by the backend after a successful submit.
    pub fn created(&self) -> Option<&Policy> {
        self.created.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
