//! End-to-end runs of the request pipeline against a mocked scoring API.
use async_trait::async_trait;
use census_transcode::audit::{AuditLog, RESULT_KEY, TRANSCODED_KEY};
use census_transcode::config::Config;
use census_transcode::dto::GatewayEvent;
use census_transcode::error::ServiceError;
use census_transcode::gateway::Gateway;
use census_transcode::response::{ResponsePayload, Status};
use census_transcode::scoring::ScoringClient;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCORING_PATH: &str = "/census/v1/customer/cust-1/campaign/camp-9/inline/test";

const JANE: &str = r#"{"Census":[{"Name":"Jane Doe","DOB":"19900101xx","Address":"1 Main St, Springfield, IL 62701","Phone":"555-0100","Gender":"Female"}]}"#;

#[derive(Clone, Default)]
struct MemoryAudit {
    objects: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MemoryAudit {
    fn get(&self, key: &str) -> Option<Value> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl AuditLog for MemoryAudit {
    async fn put(&self, key: &str, object: Vec<u8>) -> Result<(), ServiceError> {
        let value = serde_json::from_slice(&object).unwrap();
        self.objects.lock().unwrap().push((key.to_string(), value));
        Ok(())
    }
}

struct FailingAudit;

#[async_trait]
impl AuditLog for FailingAudit {
    async fn put(&self, _key: &str, _object: Vec<u8>) -> Result<(), ServiceError> {
        Err(ServiceError::internal_server_error("bucket unavailable"))
    }
}

fn config(base_url: &str) -> Config {
    Config::from_lookup(|name| match name {
        "CUSTOMER_ID" => Some("cust-1".to_string()),
        "CAMPAIGN_ID" => Some("camp-9".to_string()),
        "API_KEY" => Some("test-key".to_string()),
        "SCORING_BASE_URL" => Some(base_url.to_string()),
        _ => None,
    })
    .unwrap()
}

fn gateway<A: AuditLog>(base_url: &str, audit: A) -> Gateway<A> {
    let scoring = ScoringClient::new(&config(base_url)).unwrap();
    Gateway::new(scoring, audit)
}

fn event(body: &str) -> GatewayEvent {
    GatewayEvent {
        body: Some(body.to_string()),
    }
}

async fn respond<A: AuditLog>(gateway: &Gateway<A>, event: GatewayEvent) -> (u16, Value) {
    let payload = ResponsePayload::from_result(gateway.transcode(event).await);
    let body = serde_json::from_str(&payload.body).unwrap();
    (payload.status_code.code(), body)
}

#[tokio::test]
async fn forwards_normalized_census_and_reduces_response() {
    let server = MockServer::start().await;
    let expected_rows = json!({ "rows": [{ "pii": {
        "first_name": "Jane",
        "last_name": "Doe",
        "dob": "199001xx",
        "address": "1 Main St",
        "city": "Springfield",
        "state": "IL",
        "zip": "62701",
        "phone": "555-0100",
        "sex": "F"
    }}]});
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .and(header("x-api-key", "test-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(&expected_rows))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "COMPLETE" })))
        .expect(1)
        .mount(&server)
        .await;

    let audit = MemoryAudit::default();
    let gateway = gateway(&server.uri(), audit.clone());
    let (status, body) = respond(&gateway, event(JANE)).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "state": "COMPLETE" }));
    assert_eq!(audit.get(TRANSCODED_KEY), Some(expected_rows));
    assert_eq!(audit.get(RESULT_KEY), Some(json!({ "state": "COMPLETE" })));
}

#[tokio::test]
async fn drops_fields_outside_the_public_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "runTime": 1.25,
            "memberO2Scores": [{ "id": 1, "score": 0.7 }],
            "state": null,
            "internalId": "abc"
        })))
        .mount(&server)
        .await;

    let gateway = gateway(&server.uri(), MemoryAudit::default());
    let (status, body) = respond(&gateway, event(JANE)).await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "runTime": 1.25, "memberO2Scores": [{ "id": 1, "score": 0.7 }] })
    );
}

#[tokio::test]
async fn rejects_empty_body_without_calling_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let audit = MemoryAudit::default();
    let gateway = gateway(&server.uri(), audit.clone());
    for request in [GatewayEvent { body: None }, event("")] {
        let (status, body) = respond(&gateway, request).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({ "error": "Empty request body." }));
    }
    assert!(audit.get(TRANSCODED_KEY).is_none());
}

#[tokio::test]
async fn reports_validation_failures_as_bad_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = gateway(&server.uri(), MemoryAudit::default());
    let cases = [
        (r#"{"Other":[]}"#, "Invalid request data."),
        ("null", "Request is empty."),
        (r#"{"Census":[null]}"#, "Invalid request."),
        ("false", "Request is empty."),
        ("0", "Request is empty."),
        ("5", "Invalid request data."),
        (r#""abc""#, "Invalid request data."),
        (r#"{"Census":[false]}"#, "Invalid request."),
        (r#"{"Census":[5]}"#, "Invalid request."),
        (
            r#"{"Census":[{"Name":"Jane Doe","DOB":"19900101","Address":"1 Main St, Springfield","Phone":"1","Gender":"F"}]}"#,
            "Invalid address.",
        ),
    ];
    for (request, message) in cases {
        let (status, body) = respond(&gateway, event(request)).await;
        assert_eq!(status, 400, "{request}");
        assert_eq!(body, json!({ "error": message }), "{request}");
    }

    let (status, body) = respond(&gateway, event("{\"Census\":")).await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
}

#[tokio::test]
async fn passes_upstream_errors_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let audit = MemoryAudit::default();
    let gateway = gateway(&server.uri(), audit.clone());
    let result = gateway.transcode(event(JANE)).await;
    assert_eq!(result.clone().unwrap_err().status, Status::Other(429));

    let (status, body) = respond(&gateway, event(JANE)).await;
    assert_eq!(status, 429);
    assert_eq!(body, json!({ "error": "rate limited" }));
    assert!(audit.get(TRANSCODED_KEY).is_some());
    assert!(audit.get(RESULT_KEY).is_none());
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let scoring = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .respond_with(
            ResponseTemplate::new(307)
                .insert_header("Location", format!("{}/collect", elsewhere.uri()).as_str()),
        )
        .expect(1)
        .mount(&scoring)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "ELSEWHERE" })))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let audit = MemoryAudit::default();
    let gateway = gateway(&scoring.uri(), audit.clone());
    let (status, body) = respond(&gateway, event(JANE)).await;

    assert_eq!(status, 400);
    assert!(body["error"].is_string());
    assert_ne!(body, json!({ "state": "ELSEWHERE" }));
    assert!(audit.get(RESULT_KEY).is_none());
    assert_eq!(elsewhere.received_requests().await.unwrap_or_default().len(), 0);
}

#[tokio::test]
async fn transport_failure_is_a_single_encoded_500() {
    let gateway = gateway("http://127.0.0.1:1", MemoryAudit::default());
    let (status, body) = respond(&gateway, event(JANE)).await;

    assert_eq!(status, 500);
    let message = body["error"].as_str().unwrap();
    assert!(!message.is_empty());
    assert!(serde_json::from_str::<Value>(message).is_err());
}

#[tokio::test]
async fn unreadable_or_empty_upstream_body_is_a_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let gateway = gateway(&server.uri(), MemoryAudit::default());
    let (status, body) = respond(&gateway, event(JANE)).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "Response body is empty." }));

    let (status, body) = respond(&gateway, event(JANE)).await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn audit_failures_never_reach_the_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "COMPLETE" })))
        .mount(&server)
        .await;

    let gateway = gateway(&server.uri(), FailingAudit);
    let (status, body) = respond(&gateway, event(JANE)).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "state": "COMPLETE" }));
}
