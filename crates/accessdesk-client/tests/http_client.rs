use accessdesk_client::HttpPolicyClient;
use accessdesk_core::prelude::*;
use accessdesk_core::IntegrationConfig;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn policy_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "appId": "a1",
        "visibleToEveryone": true,
        "accessDurationType": "FIXED",
        "accessDurationDays": 7,
        "useAppOwnerAsReviewer": true,
        "createdAt": "2024-03-01T10:00:00Z"
    })
}

async fn client_for(server: &MockServer) -> HttpPolicyClient {
    HttpPolicyClient::new(&format!("{}/api", server.uri())).unwrap()
}

#[tokio::test]
async fn list_policies_passes_acting_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/policies"))
        .and(query_param("userId", "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([policy_json("p1", "CRM")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let policies = client.list_policies(Some("u1")).await.unwrap();

    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].name, "CRM");
    assert_eq!(policies[0].access_duration_type, AccessDurationType::Fixed);
    assert_eq!(policies[0].access_duration_days, Some(7));
    assert!(policies[0].created_at.is_some());
}

#[tokio::test]
async fn non_success_status_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/policies/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such policy"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_policy("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Failed to fetch policy: Not Found");
}

#[tokio::test]
async fn create_posts_policy_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/policies"))
        .and(body_partial_json(json!({
            "name": "New",
            "appId": "a1",
            "accessDurationType": "INDEFINITE"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(policy_json("p9", "New")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let draft = Policy {
        id: "p9".into(),
        name: "New".into(),
        app_id: "a1".into(),
        visible_to_everyone: true,
        ..Policy::default()
    };
    let created = client.create_policy(&draft).await.unwrap();

    assert_eq!(created.id, "p9");
}

#[tokio::test]
async fn update_uses_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/policies/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(policy_json("p1", "Renamed")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let draft = Policy {
        id: "p1".into(),
        name: "Renamed".into(),
        app_id: "a1".into(),
        ..Policy::default()
    };
    assert_eq!(client.update_policy("p1", &draft).await.unwrap().name, "Renamed");
}

#[tokio::test]
async fn delete_ignores_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/policies/p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.delete_policy("p1").await.unwrap();
}

#[tokio::test]
async fn membership_endpoints_return_updated_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/policies/p1/groups/g2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(policy_json("p1", "CRM")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/policies/p1/users/u2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.add_group_to_policy("p1", "g2").await.unwrap().id, "p1");
    let err = client.remove_user_from_policy("p1", "u2").await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(
        err.to_string(),
        "Failed to remove user from policy: Internal Server Error"
    );
}

#[tokio::test]
async fn integration_test_sends_provider_and_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/integrations/test"))
        .and(body_json(json!({
            "provider": "okta",
            "stepType": "add_to_group",
            "config": { "target": "sales", "parameters": { "groupId": "00g1" } }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "ok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let config = IntegrationConfig {
        target: "sales".into(),
        parameters: json!({"groupId": "00g1"}).as_object().cloned(),
    };
    let result = client
        .test_integration("okta", "add_to_group", &config)
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.message, "ok");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.list_users().await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
    assert_eq!(err.status_code(), None);
}
