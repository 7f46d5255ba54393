//! HTTP client for the AccessDesk policy backend.
//!
//! [`HttpPolicyClient`] implements [`PolicyApi`] over `reqwest`. Each call is
//! a single request: no retries, no caching. Failures are logged here and
//! returned to the caller unchanged.

use accessdesk_core::{
    ApiError, ApiResult, App, Group, IntegrationConfig, IntegrationTestResult, Policy, PolicyApi,
    User,
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IntegrationTestRequest<'a> {
    provider: &'a str,
    step_type: &'a str,
    config: &'a IntegrationConfig,
}

#[derive(Debug, Clone)]
pub struct HttpPolicyClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpPolicyClient {
    /// Creates a client for an API root such as `http://localhost:3000/api`.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "policy api request");
        self.http
            .request(method, url)
            .header("Accept", "application/json")
    }

    async fn dispatch(&self, action: &str, req: RequestBuilder) -> ApiResult<Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::transport(action, e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "policy api error body");
            let reason = status.canonical_reason().unwrap_or(status.as_str());
            return Err(ApiError::status(action, status.as_u16(), reason));
        }
        Ok(resp)
    }

    async fn fetch<T: DeserializeOwned>(&self, action: &str, req: RequestBuilder) -> ApiResult<T> {
        let result = match self.dispatch(action, req).await {
            Ok(resp) => resp
                .json::<T>()
                .await
                .map_err(|e| ApiError::decode(action, e.to_string())),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!(action, error = %e, "policy api call failed");
        }
        result
    }

    async fn execute(&self, action: &str, req: RequestBuilder) -> ApiResult<()> {
        let result = self.dispatch(action, req).await.map(|_| ());
        if let Err(e) = &result {
            error!(action, error = %e, "policy api call failed");
        }
        result
    }
}

#[async_trait]
impl PolicyApi for HttpPolicyClient {
    async fn list_policies(&self, acting_as: Option<&str>) -> ApiResult<Vec<Policy>> {
        let mut req = self.request(Method::GET, &["policies"]);
        if let Some(user_id) = acting_as.filter(|id| !id.is_empty()) {
            req = req.query(&[("userId", user_id)]);
        }
        self.fetch("fetch policies", req).await
    }

    async fn get_policy(&self, id: &str) -> ApiResult<Policy> {
        let req = self.request(Method::GET, &["policies", id]);
        self.fetch("fetch policy", req).await
    }

    async fn create_policy(&self, policy: &Policy) -> ApiResult<Policy> {
        let req = self.request(Method::POST, &["policies"]).json(policy);
        self.fetch("create policy", req).await
    }

    async fn update_policy(&self, id: &str, policy: &Policy) -> ApiResult<Policy> {
        let req = self.request(Method::PUT, &["policies", id]).json(policy);
        self.fetch("update policy", req).await
    }

    async fn delete_policy(&self, id: &str) -> ApiResult<()> {
        let req = self.request(Method::DELETE, &["policies", id]);
        self.execute("delete policy", req).await
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        let req = self.request(Method::GET, &["users"]);
        self.fetch("fetch users", req).await
    }

    async fn list_groups(&self) -> ApiResult<Vec<Group>> {
        let req = self.request(Method::GET, &["groups"]);
        self.fetch("fetch groups", req).await
    }

    async fn list_apps(&self) -> ApiResult<Vec<App>> {
        let req = self.request(Method::GET, &["apps"]);
        self.fetch("fetch apps", req).await
    }

    async fn get_app(&self, id: &str) -> ApiResult<App> {
        let req = self.request(Method::GET, &["apps", id]);
        self.fetch("fetch app", req).await
    }

    async fn add_user_to_policy(&self, policy_id: &str, user_id: &str) -> ApiResult<Policy> {
        let req = self.request(Method::POST, &["policies", policy_id, "users", user_id]);
        self.fetch("add user to policy", req).await
    }

    async fn remove_user_from_policy(&self, policy_id: &str, user_id: &str) -> ApiResult<Policy> {
        let req = self.request(Method::DELETE, &["policies", policy_id, "users", user_id]);
        self.fetch("remove user from policy", req).await
    }

    async fn add_group_to_policy(&self, policy_id: &str, group_id: &str) -> ApiResult<Policy> {
        let req = self.request(Method::POST, &["policies", policy_id, "groups", group_id]);
        self.fetch("add group to policy", req).await
    }

    async fn remove_group_from_policy(
        &self,
        policy_id: &str,
        group_id: &str,
    ) -> ApiResult<Policy> {
        let req = self.request(Method::DELETE, &["policies", policy_id, "groups", group_id]);
        self.fetch("remove group from policy", req).await
    }

    async fn test_integration(
        &self,
        provider: &str,
        step_type: &str,
        config: &IntegrationConfig,
    ) -> ApiResult<IntegrationTestResult> {
        let body = IntegrationTestRequest {
            provider,
            step_type,
            config,
        };
        let req = self.request(Method::POST, &["integrations", "test"]).json(&body);
        self.fetch("test integration", req).await
    }
}
