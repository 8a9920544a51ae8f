//! Handler tests for the session-gated schedule endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::TimeDelta;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::test_utils::TestHarness;

macro_rules! init_app {
    ($harness:expr) => {
        actix_test::init_service(
            App::new()
                .app_data($harness.state())
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .service(
                    web::scope("/api")
                        .service(current_schedule)
                        .service(all_resource_schedules)
                        .service(save_schedule)
                        .service(create_schedule_options),
                ),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr $(,)?) => {{
        let request = actix_test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let response = actix_test::call_service(&$app, request).await;
        let status = response.status();
        let body: Value = actix_test::read_body_json(response).await;
        (status, body)
    }};
}

fn task(value: Value) -> TaskRecord {
    TaskRecord::try_from(value).expect("task object")
}

fn labels(body: &Value) -> Vec<&str> {
    body["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .filter_map(|task| task["order"].as_str())
        .collect()
}

#[actix_web::test]
async fn current_schedule_serves_normalized_latest_tasks() {
    let harness = TestHarness::new();
    harness
        .ingest(
            "S",
            vec![
                task(json!({ "task_name": "R1_header", "resource": "R1" })),
                task(json!({ "task_name": "t1", "resource": "R1", "start": 60 })),
                task(json!({ "task_name": "travel_to_x", "resource": "R1" })),
                task(json!({ "task_name": "other", "resource": "R2" })),
            ],
        )
        .await;
    let token = harness.token_for("r1");
    let app = init_app!(harness);

    let (status, body) = post_json!(app, "/api/current-schedule", json!({ "token": token.as_str() }));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "r1");
    assert_eq!(body["scenario_name"], "S");
    assert_eq!(labels(&body), vec!["t1"]);
    assert_eq!(body["tasks"][0]["person"], "R1");
    assert_eq!(body["tasks"][0]["resource_name"], "R1");
    assert_eq!(body["tasks"][0]["start"], 60);
}

#[actix_web::test]
async fn current_schedule_prefers_the_newest_snapshot() {
    let harness = TestHarness::new();
    harness
        .ingest("old", vec![task(json!({ "task_name": "a", "resource": "R1" }))])
        .await;
    harness.clock.advance(TimeDelta::minutes(5));
    harness
        .ingest("new", vec![task(json!({ "task_name": "b", "resource": "R1" }))])
        .await;
    let token = harness.token_for("R1");
    let app = init_app!(harness);

    let (_, body) = post_json!(app, "/api/current-schedule", json!({ "token": token.as_str() }));

    assert_eq!(body["scenario_name"], "new");
    assert_eq!(labels(&body), vec!["b"]);
}

#[actix_web::test]
async fn current_schedule_is_empty_for_unknown_resources() {
    let harness = TestHarness::new();
    let token = harness.token_for("nobody");
    let app = init_app!(harness);

    let (status, body) = post_json!(app, "/api/current-schedule", json!({ "token": token.as_str() }));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "username": "nobody", "scenario_name": null, "tasks": [] }));
}

#[rstest]
#[case("/api/current-schedule", json!({}))]
#[case("/api/all-resource-schedules", json!({ "token": "garbage" }))]
#[case("/api/save-schedule", json!({ "schedule": { "id": 1 } }))]
#[case("/api/schedule", json!({ "token": "", "taskData": {} }))]
#[actix_web::test]
async fn gated_endpoints_reject_missing_or_bad_tokens(#[case] uri: &str, #[case] payload: Value) {
    let harness = TestHarness::new();
    let app = init_app!(harness);

    let (status, body) = post_json!(app, uri, payload);

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[actix_web::test]
async fn expired_tokens_are_rejected() {
    let harness = TestHarness::new();
    let token = harness.token_for("R1");
    harness.clock.advance(TimeDelta::days(8));
    let app = init_app!(harness);

    let (status, _) = post_json!(app, "/api/current-schedule", json!({ "token": token.as_str() }));

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn all_resource_schedules_returns_every_resource_once() {
    let harness = TestHarness::new();
    harness
        .ingest(
            "S",
            vec![
                task(json!({ "task_name": "a", "resource": "R1" })),
                task(json!({ "task_name": "b", "resource": "R2", "person": "Dana" })),
            ],
        )
        .await;
    harness.clock.advance(TimeDelta::minutes(1));
    harness
        .ingest("T", vec![task(json!({ "task_name": "c", "resource": "R1" }))])
        .await;
    let token = harness.token_for("R2");
    let app = init_app!(harness);

    let (status, body) =
        post_json!(app, "/api/all-resource-schedules", json!({ "token": token.as_str() }));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resource_names"], json!(["R1", "R2"]));
    assert_eq!(body["resource_scenarios"], json!({ "R1": "T", "R2": "S" }));
    assert_eq!(body["scenario_name"], Value::Null);
    assert_eq!(labels(&body), vec!["c", "b"]);
    assert_eq!(body["tasks"][0]["person"], "R1");
    assert_eq!(body["tasks"][1]["person"], "Dana");
}

#[actix_web::test]
async fn bearer_header_authorizes_requests() {
    let harness = TestHarness::new();
    let token = harness.token_for("R1");
    let app = init_app!(harness);

    let request = actix_test::TestRequest::post()
        .uri("/api/all-resource-schedules")
        .insert_header(("Authorization", format!("Bearer {}", token.as_str())))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn save_schedule_appends_a_record() {
    let harness = TestHarness::new();
    let token = harness.token_for("R1");
    let app = init_app!(harness);

    let (status, body) = post_json!(
        app,
        "/api/save-schedule",
        json!({ "token": token.as_str(), "schedule": { "id": 2, "name": "Afternoon" } }),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Schedule saved successfully");
    let saved = harness.saved.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].username, "R1");
    assert_eq!(body["schedule_id"], saved[0].id.to_string());
}

#[actix_web::test]
async fn save_schedule_requires_a_schedule() {
    let harness = TestHarness::new();
    let token = harness.token_for("R1");
    let app = init_app!(harness);

    let (status, body) = post_json!(app, "/api/save-schedule", json!({ "token": token.as_str() }));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "schedule");
}

#[actix_web::test]
async fn schedule_options_offers_two_candidates() {
    let harness = TestHarness::new();
    let token = harness.token_for("R1");
    let app = init_app!(harness);

    let (status, body) = post_json!(
        app,
        "/api/schedule",
        json!({ "token": token.as_str(), "taskData": { "taskName": "Inspect", "duration": "90" } }),
    );

    assert_eq!(status, StatusCode::OK);
    let schedules = body["schedules"].as_array().expect("schedules");
    assert_eq!(schedules.len(), 2);
    assert_eq!(schedules[0]["tasks"][0]["person"], "R1");
    assert_eq!(schedules[0]["tasks"][0]["taskName"], "Inspect");
}

#[actix_web::test]
async fn schedule_options_validates_task_data() {
    let harness = TestHarness::new();
    let token = harness.token_for("R1");
    let app = init_app!(harness);

    let (status, body) = post_json!(
        app,
        "/api/schedule",
        json!({ "token": token.as_str(), "taskData": { "taskName": "Inspect", "duration": 0 } }),
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
