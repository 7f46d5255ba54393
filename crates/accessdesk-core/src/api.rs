//! The backend contract the console is written against.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::model::{
    App, Group, IntegrationConfig, IntegrationStep, IntegrationTestResult, Policy, User,
};

/// One method per REST endpoint of the policy backend.
///
/// Implementations are stateless: no retries, no caching. Every failure is
/// logged by the implementation and handed back to the caller unchanged.
#[async_trait]
pub trait PolicyApi: Send + Sync {
    /// Lists policies, optionally as seen by `acting_as` (sent as `userId`).
    async fn list_policies(&self, acting_as: Option<&str>) -> ApiResult<Vec<Policy>>;

    async fn get_policy(&self, id: &str) -> ApiResult<Policy>;

    async fn create_policy(&self, policy: &Policy) -> ApiResult<Policy>;

    async fn update_policy(&self, id: &str, policy: &Policy) -> ApiResult<Policy>;

    async fn delete_policy(&self, id: &str) -> ApiResult<()>;

    async fn list_users(&self) -> ApiResult<Vec<User>>;

    async fn list_groups(&self) -> ApiResult<Vec<Group>>;

    async fn list_apps(&self) -> ApiResult<Vec<App>>;

    async fn get_app(&self, id: &str) -> ApiResult<App>;

    async fn add_user_to_policy(&self, policy_id: &str, user_id: &str) -> ApiResult<Policy>;

    async fn remove_user_from_policy(&self, policy_id: &str, user_id: &str) -> ApiResult<Policy>;

    async fn add_group_to_policy(&self, policy_id: &str, group_id: &str) -> ApiResult<Policy>;

    async fn remove_group_from_policy(&self, policy_id: &str, group_id: &str)
    -> ApiResult<Policy>;

    /// Asks the backend to dry-run an integration against a provider.
    async fn test_integration(
        &self,
        provider: &str,
        step_type: &str,
        config: &IntegrationConfig,
    ) -> ApiResult<IntegrationTestResult>;

    async fn test_provisioning_step(
        &self,
        step: &IntegrationStep,
    ) -> ApiResult<IntegrationTestResult> {
        self.test_integration(&step.provider, &step.step_type, &IntegrationConfig::from(step))
            .await
    }

    async fn test_revocation_step(
        &self,
        step: &IntegrationStep,
    ) -> ApiResult<IntegrationTestResult> {
        self.test_integration(&step.provider, &step.step_type, &IntegrationConfig::from(step))
            .await
    }
}
