//! HTTP tests: the full router driven through `oneshot`, no listener.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use forge_api::{create_app, ApiConfig, AppState};
use forge_quality::ValidationProfile;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(ApiConfig::default(), ValidationProfile::standard()).unwrap();
    create_app(state)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn clean_dataset() -> Value {
    json!({
        "clients": [{"ClientID": "C1", "ClientName": "Acme", "PriorityLevel": 2, "RequestedTaskIDs": "T1"}],
        "workers": [{"WorkerID": "W1", "WorkerName": "Ann", "Skills": "rust", "MaxLoadPerPhase": 4}],
        "tasks": [{"TaskID": "T1", "TaskName": "Build", "Duration": 2, "RequiredSkills": "rust", "AssignedWorkers": "W1"}]
    })
}

// ---------------------------------------------------------------------------
// Health and ingestion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_version() {
    let (status, json) = send(app(), Method::GET, "/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], "1.0.0");
}

#[tokio::test]
async fn ingest_rows_maps_headers() {
    let body = json!({"rows": [{"id": "W1", "name": "Ann", "slots": "1-3"}]});
    let (status, json) = send(app(), Method::POST, "/v1/ingest/workers", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["records"][0]["WorkerID"], "W1");
    assert_eq!(json["records"][0]["AvailableSlots"], json!([1, 2, 3]));
    assert_eq!(json["diagnostics"][0]["category"], "mapping");
}

#[tokio::test]
async fn ingest_csv_content() {
    let body = json!({"fileName": "tasks.csv", "content": "TaskID,TaskName,Duration\nT1,Build,3\n"});
    let (status, json) = send(app(), Method::POST, "/v1/ingest/task", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["records"][0]["Duration"], 3);
}

#[tokio::test]
async fn ingest_rejects_unknown_kind_and_format() {
    let (status, json) = send(app(), Method::POST, "/v1/ingest/projects", Some(json!({"rows": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "SCHEMA");

    let body = json!({"fileName": "clients.xlsx", "content": ""});
    let (status, json) = send(app(), Method::POST, "/v1/ingest/clients", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "DECODE");

    let (status, _) = send(app(), Method::POST, "/v1/ingest/clients", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_returns_summary_and_groups() {
    let mut dataset = clean_dataset();
    dataset["clients"][0]["RequestedTaskIDs"] = json!("T1;T9");

    let (status, json) = send(app(), Method::POST, "/v1/validate", Some(dataset)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"]["totalRecords"], 3);
    assert_eq!(json["summary"]["dataQuality"], "67%");
    assert_eq!(json["crossReferenceDiagnostics"][0]["message"], "Task ID T9 not found in uploaded Tasks");
    assert_eq!(json["grouped"]["clients"].as_array().unwrap().len(), 1);
    assert_eq!(json["counts"]["errors"], 1);
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rules_catalog_lists_six_kinds() {
    let (status, json) = send(app(), Method::GET, "/v1/rules/catalog", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 6);
    assert_eq!(json[2]["type"], "loadLimit");
    assert_eq!(json[2]["label"], "Load Limit");
}

#[tokio::test]
async fn rules_suggest_may_return_null() {
    let body = json!({"text": "Sales should not work more than 3 slots"});
    let (_, json) = send(app(), Method::POST, "/v1/rules/suggest", Some(body)).await;
    assert_eq!(json["suggestion"]["type"], "loadLimit");
    assert_eq!(json["suggestion"]["parameters"]["maxSlotsPerPhase"], 2);

    let (_, json) = send(app(), Method::POST, "/v1/rules/suggest", Some(json!({"text": "hello"}))).await;
    assert!(json["suggestion"].is_null());
}

#[tokio::test]
async fn rules_add_then_export() {
    let body = json!({"rules": [], "rule": {"type": "coRun", "name": "Pair", "parameters": {"tasks": ["T1", "T2"]}}});
    let (status, json) = send(app(), Method::POST, "/v1/rules", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["rules"][0]["priority"], 1);
    assert!(json["rules"][0]["id"].as_str().unwrap().starts_with("rule-"));

    let (status, config) = send(app(), Method::POST, "/v1/rules/export", Some(json)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(config["version"], "1.0");
    assert_eq!(config["metadata"]["totalRules"], 1);
    assert_eq!(config["metadata"]["ruleTypes"], json!(["coRun"]));
}

#[tokio::test]
async fn rules_add_rejects_incomplete_draft() {
    let body = json!({"rules": [], "rule": {"type": "coRun"}});
    let (status, json) = send(app(), Method::POST, "/v1/rules", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "RULE");
    assert!(json["error"].as_str().unwrap().contains("Rule name is required"));

    let body = json!({"rules": [], "rule": {"name": "Pair"}});
    let (status, json) = send(app(), Method::POST, "/v1/rules", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Rule type is required"));
}

#[tokio::test]
async fn rules_add_keeps_form_parameters() {
    let body = json!({"rule": {"type": "loadLimit", "name": "Cap", "parameters": {"maxSlotsPerPhase": 2, "note": "sales"}}});
    let (status, json) = send(app(), Method::POST, "/v1/rules", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["rules"][0]["parameters"], json!({"maxSlotsPerPhase": 2, "note": "sales"}));
}

#[tokio::test]
async fn rules_remove_keeps_priorities() {
    let rules = json!([
        {"id": "rule-1", "type": "coRun", "name": "a", "parameters": {"tasks": []}, "priority": 1},
        {"id": "rule-2", "type": "loadLimit", "name": "b", "parameters": {}, "priority": 2},
        {"id": "rule-3", "type": "patternMatch", "name": "c", "parameters": {"regex": "^T"}, "priority": 3}
    ]);

    let body = json!({"rules": rules.clone(), "id": "rule-2"});
    let (status, json) = send(app(), Method::POST, "/v1/rules/remove", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    let priorities: Vec<u64> = json["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["priority"].as_u64().unwrap())
        .collect();
    assert_eq!(priorities, vec![1, 3]);
    assert_eq!(json["rules"][1]["parameters"]["regex"], "^T");

    let body = json!({"rules": rules, "id": "rule-9"});
    let (status, json) = send(app(), Method::POST, "/v1/rules/remove", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "RULE");
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_clean_dataset() {
    let (status, json) = send(app(), Method::POST, "/v1/export", Some(clean_dataset())).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = json["artifacts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["clients.csv", "workers.csv", "tasks.csv"]);
}

#[tokio::test]
async fn export_blocked_by_errors() {
    let mut dataset = clean_dataset();
    dataset["tasks"][0]["AssignedWorkers"] = json!("W9");

    let (status, json) = send(app(), Method::POST, "/v1/export", Some(dataset.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "EXPORT_BLOCKED");
    assert_eq!(json["errorCount"], 1);

    dataset["enforceGate"] = json!(false);
    dataset["include"] = json!({"clients": false, "workers": false});
    let (status, json) = send(app(), Method::POST, "/v1/export", Some(dataset)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["artifacts"][0]["name"], "tasks.csv");
}

#[tokio::test]
async fn metrics_count_pipeline_runs() {
    let app = app();
    send(app.clone(), Method::POST, "/v1/validate", Some(clean_dataset())).await;

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("forge_pipeline_runs_total 1"));
}
