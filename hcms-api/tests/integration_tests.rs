//! Integration tests for HCMS API endpoints
//!
//! These tests drive the full router over a fixture-seeded in-memory store
//! with the clock pinned to 2024-03-01.

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use hcms_api::{build_app, ApiConfig, AppState, AuthConfig};
use hcms_core::{CompanyId, FilterPolicy};
use hcms_store::Fixture;
use serde_json::{json, Value};

const FIXTURE: &str = r#"{
    "now": "2024-03-01T09:00:00",
    "projects": [
        {
            "id": 10, "company_id": 1, "title": "Main site",
            "contract_start": "2024-01-01", "contract_end": "2025-01-01",
            "monthly_points": 100, "created_at": "2023-12-01T10:00:00"
        },
        {
            "id": 11, "company_id": 1, "title": "Archive",
            "contract_start": "2022-01-01", "contract_end": "2023-01-01",
            "monthly_points": 50, "created_at": "2021-12-01T10:00:00"
        },
        {
            "id": 20, "company_id": 2, "title": "Other tenant",
            "contract_start": "2024-01-01", "contract_end": "2025-01-01",
            "monthly_points": 100
        }
    ],
    "payments": [{ "project_id": 10, "status": 1 }],
    "tickets": [{ "id": 5, "company_id": 1, "project_id": 10, "title": "Mail outage" }],
    "comments": [
        {
            "id": 1, "ticket_id": 5, "writer": { "name": "Seo" },
            "worker_type": 2, "point": 150, "created_at": "2024-02-01T09:00:00"
        }
    ],
    "ledger": [
        {
            "id": 1, "project_id": 10, "company_id": 1, "ticket_id": 5,
            "content": "Mail server restore", "amount": 150,
            "kind": 2, "state": 2, "occurred_at": "2024-02-01T10:00:00"
        },
        {
            "id": 2, "project_id": 10, "company_id": 1,
            "content": "Drafted work", "amount": 90,
            "kind": 2, "state": 1, "occurred_at": "2024-02-02T10:00:00"
        },
        {
            "id": 3, "project_id": 20, "company_id": 2,
            "content": "Other tenant work", "amount": 70,
            "kind": 2, "state": 2, "occurred_at": "2024-02-01T10:00:00"
        }
    ]
}"#;

const INGEST_KEY: &str = "ingest-secret";

fn company_header() -> HeaderName {
    HeaderName::from_static("x-company-id")
}

fn api_key_header() -> HeaderName {
    HeaderName::from_static("x-api-key")
}

/// Create test server with the given config and auth
async fn create_server_with(config: ApiConfig, auth: AuthConfig) -> TestServer {
    let fixture = Fixture::from_json(FIXTURE).unwrap();
    let state = AppState::from_fixture(config, fixture)
        .await
        .unwrap()
        .with_auth(auth);
    TestServer::new(build_app(state)).unwrap()
}

/// Create test server with header identity and an ingest key
async fn create_test_server() -> TestServer {
    let auth = AuthConfig {
        ingest_api_keys: vec![INGEST_KEY.to_string()],
        ..Default::default()
    };
    create_server_with(ApiConfig::default(), auth).await
}

async fn get_as(server: &TestServer, path: &str, company: &'static str) -> axum_test::TestResponse {
    server
        .get(path)
        .add_header(company_header(), HeaderValue::from_static(company))
        .await
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;

    let response = server.get("/api/v1/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["components"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_health_reports_approximate_months() {
    let config = ApiConfig {
        month_arithmetic: hcms_core::MonthArithmeticKind::ThirtyDay,
        ..Default::default()
    };
    let server = create_server_with(config, AuthConfig::default()).await;

    let body: Value = server.get("/healthz").await.json();
    assert_eq!(body["status"], "degraded");
}

// ============ Balance Endpoint Tests ============

#[tokio::test]
async fn test_remaining_points() {
    let server = create_test_server().await;

    let response = get_as(&server, "/api/v1/projects/10/points/remaining", "1").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["remaining_points"], 450);
    assert_eq!(body["total_points"], 600);
    assert_eq!(body["used_points"], 150);
    assert_eq!(body["cycle"]["status"], "active");
    assert_eq!(body["cycle"]["index"], 0);
}

#[tokio::test]
async fn test_foreign_project_is_indistinguishable_from_missing() {
    let server = create_test_server().await;

    let foreign = get_as(&server, "/api/v1/projects/20/points/remaining", "1").await;
    foreign.assert_status_not_found();
    let missing = get_as(&server, "/api/v1/projects/404/points/remaining", "1").await;
    missing.assert_status_not_found();

    let foreign: Value = foreign.json();
    let missing: Value = missing.json();
    assert_eq!(foreign["code"], "NOT_FOUND");
    assert_eq!(foreign["code"], missing["code"]);
}

#[tokio::test]
async fn test_missing_company_header_is_rejected() {
    let server = create_test_server().await;

    let response = server.get("/api/v1/projects/10/points/remaining").await;

    response.assert_status_unauthorized();
}

// ============ Eligibility Endpoint Tests ============

#[tokio::test]
async fn test_eligibility() {
    let server = create_test_server().await;

    let body: Value = get_as(&server, "/api/v1/projects/10/eligibility", "1")
        .await
        .json();
    assert_eq!(body["eligible"], true);
    assert_eq!(body["blocking_reasons"], json!([]));

    let body: Value = get_as(&server, "/api/v1/projects/11/eligibility", "1")
        .await
        .json();
    assert_eq!(body["eligible"], false);
    assert_eq!(body["payment_completed"], false);
    assert_eq!(body["contract_active"], false);
    let reasons = body["blocking_reasons"].as_array().unwrap();
    assert!(reasons.contains(&json!("payment_incomplete")));
    assert!(reasons.contains(&json!("contract_inactive")));
}

// ============ Maintenance Project Tests ============

#[tokio::test]
async fn test_maintenance_projects_listing() {
    let server = create_test_server().await;

    let response = get_as(&server, "/api/v1/maintenance/projects", "1").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["projects"][0]["id"], 10);
    assert_eq!(body["projects"][0]["permit"], true);
    assert_eq!(body["projects"][0]["contract_status"], "active");
    assert_eq!(body["projects"][0]["contract_date"], "2024-01-01");
    assert_eq!(body["projects"][1]["permit"], false);
    assert_eq!(body["projects"][1]["contract_status"], "expired");
}

// ============ Point Usage Tests ============

#[tokio::test]
async fn test_point_usage_report() {
    let server = create_test_server().await;

    let response = get_as(&server, "/api/v1/point-usage", "1").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["maintenance_customer"], true);
    assert_eq!(body["current_project"]["id"], 10);
    assert_eq!(body["remaining_points"], 450);
    assert_eq!(body["period_start"], "2024-01-01");
    assert_eq!(body["chart_data"].as_array().unwrap().len(), 6);

    let histories = &body["point_histories"];
    assert_eq!(histories["total"], 2);
    assert_eq!(histories["items"][0]["id"], 2);
    assert_eq!(histories["items"][1]["ticket_title"], "Mail outage");
    assert_eq!(histories["items"][1]["occurred_at"], "2024-02-01 10:00:00");
}

#[tokio::test]
async fn test_point_usage_pagination() {
    let server = create_test_server().await;

    let response = server
        .get("/api/v1/point-usage")
        .add_header(company_header(), HeaderValue::from_static("1"))
        .add_query_param("per_page", 1)
        .add_query_param("page", 2)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["point_histories"]["total_pages"], 2);
    assert_eq!(body["point_histories"]["items"][0]["id"], 1);

    let response = server
        .get("/api/v1/point-usage")
        .add_header(company_header(), HeaderValue::from_static("1"))
        .add_query_param("per_page", 0)
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "HCMS-PAGE-001");
}

#[tokio::test]
async fn test_point_usage_unknown_project_falls_back() {
    let server = create_test_server().await;

    let response = server
        .get("/api/v1/point-usage")
        .add_header(company_header(), HeaderValue::from_static("1"))
        .add_query_param("project_id", "20")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["current_project"]["id"], 10);
}

#[tokio::test]
async fn test_lenient_filters_are_listed() {
    let server = create_test_server().await;

    let response = server
        .get("/api/v1/point-usage")
        .add_header(company_header(), HeaderValue::from_static("1"))
        .add_query_param("date_from", "yesterday")
        .add_query_param("search_text", "MAIL")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ignored_filters"][0]["field"], "date_from");
    assert_eq!(body["point_histories"]["total"], 1);
}

#[tokio::test]
async fn test_strict_filters_are_rejected() {
    let config = ApiConfig {
        filter_policy: FilterPolicy::Strict,
        ..Default::default()
    };
    let server = create_server_with(config, AuthConfig::default()).await;

    let response = server
        .get("/api/v1/point-usage")
        .add_header(company_header(), HeaderValue::from_static("1"))
        .add_query_param("point_type", "9")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "HCMS-FILTER-001");
}

// ============ Ledger Ingest Tests ============

#[tokio::test]
async fn test_append_ledger_entry() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/ledger/entries")
        .add_header(api_key_header(), HeaderValue::from_static(INGEST_KEY))
        .json(&json!({
            "project_id": 10,
            "company_id": 1,
            "content": "Certificate renewal",
            "amount": 50,
            "kind": 2,
            "state": 2,
            "occurred_at": "2024-02-20T15:00:00"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["id"], 4);

    let body: Value = get_as(&server, "/api/v1/projects/10/points/remaining", "1")
        .await
        .json();
    assert_eq!(body["remaining_points"], 400);
}

#[tokio::test]
async fn test_append_ledger_entry_rejections() {
    let server = create_test_server().await;
    let entry = json!({
        "project_id": 10, "company_id": 1, "amount": 5, "kind": 2, "state": 2
    });

    server
        .post("/api/v1/ledger/entries")
        .json(&entry)
        .await
        .assert_status_unauthorized();

    server
        .post("/api/v1/ledger/entries")
        .add_header(api_key_header(), HeaderValue::from_static("wrong"))
        .json(&entry)
        .await
        .assert_status_unauthorized();

    let response = server
        .post("/api/v1/ledger/entries")
        .add_header(api_key_header(), HeaderValue::from_static(INGEST_KEY))
        .json(&json!({
            "project_id": 20, "company_id": 1, "amount": 5, "kind": 2, "state": 2
        }))
        .await;
    response.assert_status_not_found();

    let response = server
        .post("/api/v1/ledger/entries")
        .add_header(api_key_header(), HeaderValue::from_static(INGEST_KEY))
        .json(&json!({
            "project_id": 10, "company_id": 1, "amount": -5, "kind": 2, "state": 2
        }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "HCMS-LEDGER-001");
}

// ============ Bearer Identity Tests ============

#[tokio::test]
async fn test_bearer_token_resolves_company() {
    let auth = AuthConfig {
        enabled: true,
        bearer_tokens: vec![("token-one".to_string(), CompanyId(1))],
        ..Default::default()
    };
    let server = create_server_with(ApiConfig::default(), auth).await;

    let response = server
        .get("/api/v1/maintenance/projects")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer token-one"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["count"], 2);

    // The trusted header is not honoured once tokens are required
    get_as(&server, "/api/v1/maintenance/projects", "1")
        .await
        .assert_status_unauthorized();

    server
        .get("/api/v1/maintenance/projects")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer nope"))
        .await
        .assert_status_unauthorized();
}
