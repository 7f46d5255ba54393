#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use accessdesk_core::prelude::*;
use accessdesk_core::{IntegrationConfig, IntegrationTestResult};
use async_trait::async_trait;
use serde_json::json;
use time::macros::datetime;

/// In-memory backend with per-operation failure switches.
#[derive(Default)]
pub struct FakeApi {
    pub policies: Mutex<Vec<Policy>>,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub apps: Vec<App>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn seeded() -> Self {
        Self {
            policies: Mutex::new(vec![sample_policy()]),
            users: users(),
            groups: groups(),
            apps: apps(),
            ..Self::default()
        }
    }

    pub fn fail(&self, op: &str) {
        self.failing.lock().unwrap().insert(op.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, op: &str) -> bool {
        self.calls().iter().any(|c| c == op)
    }

    fn enter(&self, op: &str, action: &str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(op.to_string());
        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::status(action, 500, "Internal Server Error"));
        }
        Ok(())
    }

    fn find(&self, id: &str, action: &str) -> ApiResult<Policy> {
        self.policies
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::status(action, 404, "Not Found"))
    }
}

#[async_trait]
impl PolicyApi for FakeApi {
    async fn list_policies(&self, acting_as: Option<&str>) -> ApiResult<Vec<Policy>> {
        self.enter("list_policies", "fetch policies")?;
        if let Some(user) = acting_as {
            self.calls.lock().unwrap().push(format!("acting_as={user}"));
        }
        Ok(self.policies.lock().unwrap().clone())
    }

    async fn get_policy(&self, id: &str) -> ApiResult<Policy> {
        self.enter("get_policy", "fetch policy")?;
        self.find(id, "fetch policy")
    }

    async fn create_policy(&self, policy: &Policy) -> ApiResult<Policy> {
        self.enter("create_policy", "create policy")?;
        self.policies.lock().unwrap().push(policy.clone());
        Ok(policy.clone())
    }

    async fn update_policy(&self, id: &str, policy: &Policy) -> ApiResult<Policy> {
        self.enter("update_policy", "update policy")?;
        let mut policies = self.policies.lock().unwrap();
        let slot = policies
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::status("update policy", 404, "Not Found"))?;
        *slot = policy.clone();
        Ok(policy.clone())
    }

    async fn delete_policy(&self, id: &str) -> ApiResult<()> {
        self.enter("delete_policy", "delete policy")?;
        self.policies.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.enter("list_users", "fetch users")?;
        Ok(self.users.clone())
    }

    async fn list_groups(&self) -> ApiResult<Vec<Group>> {
        self.enter("list_groups", "fetch groups")?;
        Ok(self.groups.clone())
    }

    async fn list_apps(&self) -> ApiResult<Vec<App>> {
        self.enter("list_apps", "fetch apps")?;
        Ok(self.apps.clone())
    }

    async fn get_app(&self, id: &str) -> ApiResult<App> {
        self.enter("get_app", "fetch app")?;
        self.apps
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| ApiError::status("fetch app", 404, "Not Found"))
    }

    async fn add_user_to_policy(&self, policy_id: &str, _user_id: &str) -> ApiResult<Policy> {
        self.enter("add_user_to_policy", "add user to policy")?;
        self.find(policy_id, "add user to policy")
    }

    async fn remove_user_from_policy(&self, policy_id: &str, _user_id: &str) -> ApiResult<Policy> {
        self.enter("remove_user_from_policy", "remove user from policy")?;
        self.find(policy_id, "remove user from policy")
    }

    async fn add_group_to_policy(&self, policy_id: &str, _group_id: &str) -> ApiResult<Policy> {
        self.enter("add_group_to_policy", "add group to policy")?;
        self.find(policy_id, "add group to policy")
    }

    async fn remove_group_from_policy(
        &self,
        policy_id: &str,
        _group_id: &str,
    ) -> ApiResult<Policy> {
        self.enter("remove_group_from_policy", "remove group from policy")?;
        self.find(policy_id, "remove group from policy")
    }

    async fn test_integration(
        &self,
        provider: &str,
        step_type: &str,
        config: &IntegrationConfig,
    ) -> ApiResult<IntegrationTestResult> {
        self.enter("test_integration", "test integration")?;
        Ok(IntegrationTestResult {
            success: true,
            message: format!("{provider}:{step_type}:{}", config.target),
        })
    }
}

pub fn user(id: &str, email: &str, first: &str, last: &str) -> User {
    User {
        id: id.into(),
        email: email.into(),
        first_name: first.into(),
        last_name: last.into(),
        ..User::default()
    }
}

pub fn users() -> Vec<User> {
    vec![
        user("u1", "admin@example.com", "Ada", "Admin"),
        user("u2", "grace@example.com", "Grace", "Hopper"),
        user("u3", "alan@example.com", "Alan", "Turing"),
    ]
}

pub fn groups() -> Vec<Group> {
    vec![
        Group {
            id: "g1".into(),
            name: "Engineering".into(),
            description: None,
            ..Group::default()
        },
        Group {
            id: "g2".into(),
            name: "Sales".into(),
            description: Some("Field sales".into()),
            ..Group::default()
        },
    ]
}

pub fn apps() -> Vec<App> {
    vec![
        App {
            id: "a1".into(),
            name: "Salesforce".into(),
            url: Some("https://salesforce.example.com".into()),
            ..App::default()
        },
        App {
            id: "a2".into(),
            name: "GitHub".into(),
            ..App::default()
        },
    ]
}

/// A policy with every field the form exposes populated consistently.
pub fn sample_policy() -> Policy {
    let all = users();
    Policy {
        id: "p1".into(),
        name: "Salesforce access".into(),
        description: Some("Sales team CRM access".into()),
        app_id: "a1".into(),
        app: Some(apps()[0].clone()),
        visible_to_everyone: false,
        visible_groups: Some(vec![groups()[0].clone()]),
        visible_users: Some(vec![all[1].clone()]),
        visible_group_ids: Some(vec!["g1".into()]),
        visible_user_ids: Some(vec!["u2".into()]),
        access_duration_type: AccessDurationType::Fixed,
        access_duration_days: Some(14),
        use_app_owner_as_reviewer: false,
        reviewers: Some(vec![all[0].clone(), all[2].clone()]),
        reviewer_ids: Some(vec!["u1".into(), "u3".into()]),
        approval_steps: Some(vec![
            ApprovalStep {
                id: "s1".into(),
                step_type: ApprovalStepType::AppOwner,
                escalate: false,
                user_ids: None,
            },
            ApprovalStep {
                id: "s2".into(),
                step_type: ApprovalStepType::Specific,
                escalate: true,
                user_ids: Some(vec!["u1".into(), "u3".into()]),
            },
        ]),
        provisioning_steps: Some(vec![IntegrationStep {
            id: "ps1".into(),
            step_type: "add_to_group".into(),
            target: "sales".into(),
            provider: "okta".into(),
            parameters: json!({"groupId": "00g1"}).as_object().cloned(),
            description: Some("Add to Sales".into()),
            ..IntegrationStep::default()
        }]),
        revocation_steps: Some(vec![IntegrationStep {
            id: "rs1".into(),
            step_type: "remove_from_group".into(),
            target: "sales".into(),
            provider: "okta".into(),
            description: Some("Remove from Sales".into()),
            ..IntegrationStep::default()
        }]),
        created_at: Some(datetime!(2024-03-01 10:00 UTC)),
        updated_at: Some(datetime!(2024-03-02 12:30 UTC)),
        extra: json!({"ownerTeam": "revenue"}).as_object().cloned().unwrap_or_default(),
        ..Policy::default()
    }
}
