//! Reviewer pool and approval chain.

use crate::id::generate_id;
use crate::model::{ApprovalStep, ApprovalStepType, Policy, User};

use super::{PolicyForm, carry_list, list_shape};

/// Editable copy of an [`ApprovalStep`].
///
/// Keeps `selected_user_ids` as a plain list while editing; the payload only
/// carries user ids for `specific` steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalDraft {
    pub id: String,
    pub step_type: ApprovalStepType,
    pub escalate: bool,
    pub selected_user_ids: Vec<String>,
}

impl ApprovalDraft {
    pub fn new(step_type: ApprovalStepType) -> Self {
        Self {
            id: generate_id(),
            step_type,
            escalate: false,
            selected_user_ids: Vec::new(),
        }
    }

    pub fn from_step(step: &ApprovalStep) -> Self {
        Self {
            id: step.id.clone(),
            step_type: step.step_type,
            escalate: step.escalate,
            selected_user_ids: step.user_ids.clone().unwrap_or_default(),
        }
    }

    pub fn to_step(&self) -> ApprovalStep {
        ApprovalStep {
            id: self.id.clone(),
            step_type: self.step_type,
            escalate: self.escalate,
            user_ids: match self.step_type {
                ApprovalStepType::Specific => Some(self.selected_user_ids.clone()),
                ApprovalStepType::AppOwner => None,
            },
        }
    }
}

impl PolicyForm {
    pub fn use_app_owner_as_reviewer(&self) -> bool {
        self.use_app_owner_as_reviewer
    }

    pub fn set_use_app_owner_as_reviewer(&mut self, enabled: bool) {
        if self.editable() {
            self.use_app_owner_as_reviewer = enabled;
        }
    }

    pub fn reviewer_ids(&self) -> &[String] {
        &self.reviewer_ids
    }

    /// Adds or removes a reviewer.
    ///
    /// Removing a reviewer also strips the id from every approval step, so no
    /// step keeps a user who is no longer in the pool.
    pub fn toggle_reviewer(&mut self, user_id: &str) {
        if !self.editable() {
            return;
        }
        if let Some(pos) = self.reviewer_ids.iter().position(|id| id == user_id) {
            self.reviewer_ids.remove(pos);
            for step in &mut self.approval_steps {
                step.selected_user_ids.retain(|id| id != user_id);
            }
        } else {
            self.reviewer_ids.push(user_id.to_string());
        }
    }

    /// Reference users currently in the reviewer pool, in reference-list order.
    pub fn available_reviewers(&self) -> Vec<&User> {
        self.all_users
            .iter()
            .filter(|u| self.reviewer_ids.contains(&u.id))
            .collect()
    }

    pub fn approval_steps(&self) -> &[ApprovalDraft] {
        &self.approval_steps
    }

    pub fn add_approval_step(&mut self, step_type: ApprovalStepType) {
        if self.editable() {
            self.approval_steps.push(ApprovalDraft::new(step_type));
        }
    }

    pub fn remove_approval_step(&mut self, index: usize) {
        if self.editable() && index < self.approval_steps.len() {
            self.approval_steps.remove(index);
        }
    }

    /// Switching a step to `app_owner` drops its picked users.
    pub fn set_approval_step_type(&mut self, index: usize, step_type: ApprovalStepType) {
        if !self.editable() {
            return;
        }
        if let Some(step) = self.approval_steps.get_mut(index) {
            step.step_type = step_type;
            if step_type == ApprovalStepType::AppOwner {
                step.selected_user_ids.clear();
            }
        }
    }

    pub fn set_approval_step_users(&mut self, index: usize, user_ids: Vec<String>) {
        if !self.editable() {
            return;
        }
        if let Some(step) = self.approval_steps.get_mut(index) {
            step.selected_user_ids = user_ids;
        }
    }

    pub fn set_approval_step_escalate(&mut self, index: usize, escalate: bool) {
        if !self.editable() {
            return;
        }
        if let Some(step) = self.approval_steps.get_mut(index) {
            step.escalate = escalate;
        }
    }

    /// Replaces the chain with a single app-owner step.
    pub fn reset_approval_steps(&mut self) {
        if self.editable() {
            self.approval_steps = vec![ApprovalDraft::new(ApprovalStepType::AppOwner)];
        }
    }

    /// Reviewers resolve against the record's own reviewer objects first, then
    /// the reference users, then fall back to a bare id.
    pub(super) fn apply_approvals(&self, policy: &mut Policy) {
        policy.use_app_owner_as_reviewer = self.use_app_owner_as_reviewer;

        let (objects, ids) = list_shape(
            self.carried(|p| (p.reviewers.is_some(), p.reviewer_ids.is_some())),
            !self.reviewer_ids.is_empty(),
        );
        let known = policy.reviewers.take().unwrap_or_default();
        policy.reviewers = objects.then(|| {
            self.reviewer_ids
                .iter()
                .map(|id| {
                    known
                        .iter()
                        .chain(&self.all_users)
                        .find(|u| &u.id == id)
                        .cloned()
                        .unwrap_or_else(|| User::with_id(id.clone()))
                })
                .collect()
        });
        policy.reviewer_ids = ids.then(|| self.reviewer_ids.clone());

        policy.approval_steps = carry_list(
            self.carried(|p| p.approval_steps.is_some()),
            self.approval_steps.iter().map(ApprovalDraft::to_step).collect(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::App;

    fn users() -> Vec<User> {
        ["u1", "u2", "u3"]
            .iter()
            .map(|id| User {
                id: (*id).to_string(),
                email: format!("{id}@example.com"),
                first_name: "First".into(),
                last_name: (*id).to_uppercase(),
                ..User::default()
            })
            .collect()
    }

    fn form() -> PolicyForm {
        let apps = vec![App {
            id: "a1".into(),
            name: "CRM".into(),
            ..App::default()
        }];
        let mut form = PolicyForm::new(apps, None, false);
        form.set_name("Approvals");
        form.set_reference_data(users(), Vec::new());
        form
    }

    #[test]
    fn test_type_change_to_app_owner_clears_users() {
        let mut form = form();
        form.add_approval_step(ApprovalStepType::Specific);
        form.set_approval_step_users(0, vec!["u1".into()]);
        form.set_approval_step_type(0, ApprovalStepType::AppOwner);
        assert!(form.approval_steps()[0].selected_user_ids.is_empty());
    }

    #[test]
    fn test_only_specific_steps_carry_user_ids() {
        let mut form = form();
        form.add_approval_step(ApprovalStepType::AppOwner);
        form.add_approval_step(ApprovalStepType::Specific);
        form.set_approval_step_users(1, vec!["u2".into()]);
        form.set_approval_step_escalate(1, true);

        let steps = form.build_payload().unwrap().approval_steps.unwrap();
        assert_eq!(steps[0].user_ids, None);
        assert_eq!(steps[1].user_ids, Some(vec!["u2".to_string()]));
        assert!(steps[1].escalate);
    }

    #[test]
    fn test_available_reviewers_follow_pool() {
        let mut form = form();
        form.toggle_reviewer("u3");
        form.toggle_reviewer("u1");
        let ids: Vec<&str> = form.available_reviewers().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3"]);
    }

    #[test]
    fn test_unknown_reviewer_sent_by_id() {
        let mut form = form();
        form.toggle_reviewer("ghost");
        let payload = form.build_payload().unwrap();
        assert_eq!(payload.reviewers, Some(vec![User::with_id("ghost")]));
        assert_eq!(payload.reviewer_ids, Some(vec!["ghost".to_string()]));
    }

    #[test]
    fn test_reset_and_out_of_range_edits() {
        let mut form = form();
        form.add_approval_step(ApprovalStepType::Specific);
        form.add_approval_step(ApprovalStepType::Specific);
        form.set_approval_step_escalate(9, true);
        form.remove_approval_step(9);
        assert_eq!(form.approval_steps().len(), 2);

        form.reset_approval_steps();
        assert_eq!(form.approval_steps().len(), 1);
        assert_eq!(form.approval_steps()[0].step_type, ApprovalStepType::AppOwner);
    }
}
