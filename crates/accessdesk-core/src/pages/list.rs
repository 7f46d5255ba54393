use tracing::error;

use crate::api::PolicyApi;
use crate::model::Policy;
use crate::notice::{Notice, Notices};

/// Policies visible to the acting-as user.
#[derive(Debug, Default)]
pub struct PolicyListPage {
    policies: Vec<Policy>,
    error: Option<String>,
    notices: Notices,
}

impl PolicyListPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads (or reloads, for "try again") the list.
    pub async fn load(&mut self, api: &dyn PolicyApi, acting_as: Option<&str>) {
        self.error = None;
        match api.list_policies(acting_as).await {
            Ok(policies) => self.policies = policies,
            Err(e) => {
                error!(error = %e, "Failed to fetch policies");
                let message = e.to_string();
                self.notices.push(Notice::error(message.clone()));
                self.error = Some(message);
                self.policies.clear();
            }
        }
    }

    /// Deletes a policy once the user has confirmed. Returns whether it was removed.
    pub async fn delete(&mut self, api: &dyn PolicyApi, id: &str, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.error = None;
        match api.delete_policy(id).await {
            Ok(()) => {
                self.policies.retain(|p| p.id != id);
                self.notices.push(Notice::success("Policy deleted successfully."));
                true
            }
            Err(e) => {
                error!(error = %e, policy_id = id, "Failed to delete policy");
                let message = e.to_string();
                self.notices.push(Notice::error(message.clone()));
                self.error = Some(message);
                false
            }
        }
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
