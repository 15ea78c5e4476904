//! HubSpotClient against a wiremock server
//!
//! Covers list shapes, paging, the workflow endpoint fallback, error
//! classification and the submission window.

use hubspot_audit::config::AuditConfig;
use hubspot_audit::gateway::client::MAX_PAGES;
use hubspot_audit::{AuditGateway, GatewayError, HubSpotClient};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> HubSpotClient {
    let mut config = AuditConfig::default();
    config.hubspot.base_url = server.uri();
    config.hubspot.access_token = Some("pat-test-token".to_string());
    config.hubspot.rate_limit.requests_per_second = 100;
    config.hubspot.rate_limit.burst_capacity = 100;
    HubSpotClient::new(&config.hubspot).unwrap()
}

#[tokio::test]
async fn sends_bearer_token_and_reads_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/settings/v3/users"))
        .and(header("authorization", "Bearer pat-test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "1", "email": "owner@acme.test", "superAdmin": true},
                {"id": "2", "email": "rep@acme.test"}
            ]
        })))
        .mount(&server)
        .await;

    let users = client_for(&server).await.get_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], "owner@acme.test");
}

#[tokio::test]
async fn follows_paging_cursors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/pipelines/deals"))
        .and(query_param("after", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "renewals"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/pipelines/deals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "default"}],
            "paging": {"next": {"after": "p2"}}
        })))
        .mount(&server)
        .await;

    let pipelines = client_for(&server).await.get_pipelines().await.unwrap();
    let ids: Vec<_> = pipelines.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["default", "renewals"]);
}

#[tokio::test]
async fn paging_stops_at_the_page_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/properties/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"name": "endless"}],
            "paging": {"next": {"after": "again"}}
        })))
        .expect(MAX_PAGES as u64)
        .mount(&server)
        .await;

    let properties = client_for(&server)
        .await
        .get_contact_properties()
        .await
        .unwrap();
    assert_eq!(properties.len(), MAX_PAGES);
}

#[tokio::test]
async fn forms_come_back_as_a_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forms/v2/forms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"guid": "f1", "isPublished": true},
            {"guid": "f2", "isPublished": false}
        ])))
        .mount(&server)
        .await;

    let forms = client_for(&server).await.get_forms().await.unwrap();
    assert_eq!(forms.len(), 2);
}

#[tokio::test]
async fn forbidden_is_a_permission_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/settings/v3/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "status": "error",
            "message": "This app hasn't been granted all required scopes to make this call.",
            "category": "MISSING_SCOPES"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.get_users().await.unwrap_err();
    assert!(err.is_permission_denied());
    assert!(err.to_string().contains("required scopes"));
}

#[tokio::test]
async fn server_errors_and_missing_endpoints_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/v2/dashboards"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reports/v2/reports"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(matches!(
        client.get_dashboards().await,
        Err(GatewayError::Api { status: 503, .. })
    ));
    assert!(client.get_reports().await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn workflows_fall_back_to_the_first_non_empty_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/automation/v3/workflows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workflows": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/automation/v4/flows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "9", "name": "Lead routing", "isEnabled": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workflows/v3/workflows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workflows": [{"id": 1}]})))
        .expect(0)
        .mount(&server)
        .await;

    let workflows = client_for(&server).await.get_workflows().await.unwrap();
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0]["name"], "Lead routing");
}

#[tokio::test]
async fn workflows_prefer_permission_error_when_every_endpoint_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/automation/v3/workflows"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"category": "MISSING_SCOPES"})),
        )
        .mount(&server)
        .await;
    // the other three endpoints are unmatched and answer 404

    let err = client_for(&server).await.get_workflows().await.unwrap_err();
    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn counts_only_submissions_inside_the_window() {
    let server = MockServer::start().await;
    let now = chrono::Utc::now().timestamp_millis();
    let day = 24 * 60 * 60 * 1000;
    Mock::given(method("GET"))
        .and(path("/form-integrations/v1/submissions/forms/f1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"submittedAt": now - day},
                {"submittedAt": now - 5 * day},
                {"submittedAt": now - 45 * day}
            ]
        })))
        .mount(&server)
        .await;

    let summary = client_for(&server)
        .await
        .get_form_submissions("f1", 30)
        .await
        .unwrap();
    assert_eq!(summary.submissions_count, 2);
}

#[test]
fn missing_token_is_rejected_up_front() {
    let config = AuditConfig::default();
    assert!(matches!(
        HubSpotClient::new(&config.hubspot),
        Err(GatewayError::MissingToken)
    ));
}
