//! End-to-end flow: register an account, ingest a scenario, view schedules.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use schedule_backend::Trace;
use schedule_backend::domain::ports::{
    AccountProvisioning, FixtureStoreHealth, PlaceholderScheduleOptions, ScheduleIngestion,
};
use schedule_backend::domain::{
    AccountService, SavedScheduleService, ScheduleIngestionService, ScheduleQueryService,
    SessionTokenService, TRACE_ID_HEADER, TaskRecord, Username,
};
use schedule_backend::inbound::http::auth::{login, register, verify_token};
use schedule_backend::inbound::http::error::json_error_handler;
use schedule_backend::inbound::http::schedules::{
    all_resource_schedules, current_schedule, save_schedule,
};
use schedule_backend::inbound::http::state::{HttpState, HttpStatePorts};
use schedule_backend::inbound::http::users::list_users;
use schedule_backend::outbound::memory::{
    InMemoryResourceScheduleRepository, InMemorySavedScheduleRepository, InMemoryUserRepository,
};
use schedule_backend::test_support::{MutableClock, PlaintextPasswordHasher, fixture_signing_key};
use zeroize::Zeroizing;

type Accounts = AccountService<InMemoryUserRepository, PlaintextPasswordHasher>;

struct World {
    accounts: Arc<Accounts>,
    clock: Arc<MutableClock>,
    snapshots: Arc<InMemoryResourceScheduleRepository>,
    state: web::Data<HttpState>,
}

fn world() -> World {
    let start = Utc
        .with_ymd_and_hms(2026, 4, 6, 7, 30, 0)
        .single()
        .expect("valid start");
    let clock = Arc::new(MutableClock::new(start));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let tokens = SessionTokenService::new(&fixture_signing_key(), dyn_clock.clone());
    let snapshots = Arc::new(InMemoryResourceScheduleRepository::new());
    let accounts = Arc::new(AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(PlaintextPasswordHasher),
        tokens.clone(),
        dyn_clock.clone(),
    ));
    let ports = HttpStatePorts {
        accounts: accounts.clone(),
        users: accounts.clone(),
        schedules: Arc::new(ScheduleQueryService::new(snapshots.clone())),
        saved_schedules: Arc::new(SavedScheduleService::new(
            Arc::new(InMemorySavedScheduleRepository::new()),
            dyn_clock,
        )),
        options: Arc::new(PlaceholderScheduleOptions),
        store_health: Arc::new(FixtureStoreHealth),
    };
    World {
        accounts,
        clock,
        snapshots,
        state: web::Data::new(HttpState::new(ports, tokens)),
    }
}

impl World {
    async fn ingest(&self, scenario: &str, tasks: Value) {
        let Value::Array(items) = tasks else {
            panic!("tasks fixture must be an array");
        };
        let tasks = items
            .into_iter()
            .map(|item| TaskRecord::try_from(item).expect("task object"))
            .collect();
        let report = ScheduleIngestionService::new(self.snapshots.clone(), self.clock.clone())
            .ingest(scenario, tasks)
            .await
            .expect("ingestion succeeds");
        assert!(report.is_complete());
    }

    async fn provision(&self, resource: &str, password: &str) {
        let username = Username::new(resource).expect("valid resource name");
        self.accounts
            .provision(vec![username], Zeroizing::new(password.to_owned()))
            .await
            .expect("provisioning succeeds");
    }
}

macro_rules! init_app {
    ($world:expr) => {
        test::init_service(
            App::new()
                .app_data($world.state.clone())
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .wrap(Trace)
                .service(
                    web::scope("/api")
                        .service(register)
                        .service(login)
                        .service(verify_token)
                        .service(current_schedule)
                        .service(all_resource_schedules)
                        .service(save_schedule)
                        .service(list_users),
                ),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr $(,)?) => {{
        let request = test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let response = test::call_service(&$app, request).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn registered_resource_sees_only_real_tasks() {
    let world = world();
    world
        .ingest(
            "monday",
            json!([
                { "order": "R1_header", "resource": "R1" },
                { "order": "t1", "resource": "R1", "start_lb": 480, "end_ub": 540 },
                { "order": "travel_to_x", "resource": "R1" },
                { "task_name": "R1_footer", "resource": "R1" },
                { "task_name": "t2", "resource": "R2" },
            ]),
        )
        .await;
    world.provision("r1", "tester").await;
    let app = init_app!(world);

    let (status, body) = post_json!(
        app,
        "/api/login",
        json!({ "username": "r1", "password": "tester" }),
    );
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token issued").to_owned();

    let (status, body) = post_json!(app, "/api/current-schedule", json!({ "token": token }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scenario_name"], "monday");
    let tasks = body["tasks"].as_array().expect("tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["order"], "t1");
    assert_eq!(tasks[0]["person"], "R1");
    assert_eq!(tasks[0]["resource_name"], "R1");
    assert_eq!(tasks[0]["start_lb"], 480);
    assert!(tasks[0].get("resource").is_none());
}

#[actix_web::test]
async fn reingesting_a_scenario_replaces_its_snapshots() {
    let world = world();
    world
        .ingest("monday", json!([{ "task_name": "old", "resource": "R1" }]))
        .await;
    world.clock.advance(TimeDelta::minutes(10));
    world
        .ingest("monday", json!([{ "task_name": "new", "resource": "R1" }]))
        .await;
    let app = init_app!(world);

    let (_, body) = post_json!(
        app,
        "/api/register",
        json!({ "username": "planner", "password": "secret-pass" }),
    );
    let token = body["token"].as_str().expect("token").to_owned();

    let (status, body) =
        post_json!(app, "/api/all-resource-schedules", json!({ "token": token }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resource_names"], json!(["R1"]));
    assert_eq!(body["scenario_name"], "monday");
    let orders: Vec<&str> = body["tasks"]
        .as_array()
        .expect("tasks")
        .iter()
        .filter_map(|task| task["order"].as_str())
        .collect();
    assert_eq!(orders, vec!["new"]);
}

#[actix_web::test]
async fn login_token_outlives_registration_token_until_expiry() {
    let world = world();
    let app = init_app!(world);

    let (status, _) = post_json!(
        app,
        "/api/register",
        json!({ "username": "alice", "password": "secret-pass" }),
    );
    assert_eq!(status, StatusCode::CREATED);

    world.clock.advance(TimeDelta::days(3));
    let (status, body) = post_json!(
        app,
        "/api/login",
        json!({ "username": "alice", "password": "secret-pass" }),
    );
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token").to_owned();

    world.clock.advance(TimeDelta::days(6));
    let (_, body) = post_json!(app, "/api/verify-token", json!({ "token": token.clone() }));
    assert_eq!(body, json!({ "valid": true, "username": "alice" }));

    world.clock.advance(TimeDelta::days(2));
    let (_, body) = post_json!(app, "/api/verify-token", json!({ "token": token }));
    assert_eq!(body["valid"], false);
}

#[actix_web::test]
async fn errors_carry_the_request_trace_id() {
    let world = world();
    let app = init_app!(world);

    let request = test::TestRequest::post()
        .uri("/api/current-schedule")
        .set_json(json!({ "token": "not-a-token" }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["traceId"], header);
}

#[actix_web::test]
async fn user_listing_shows_registered_accounts() {
    let world = world();
    let app = init_app!(world);
    for username in ["alice", "bob"] {
        let (status, _) = post_json!(
            app,
            "/api/register",
            json!({ "username": username, "password": "secret-pass" }),
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let request = test::TestRequest::get().uri("/api/users").to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let names: Vec<&str> = body["users"]
        .as_array()
        .expect("users")
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect();
    assert_eq!(names, vec!["alice", "bob"]);
}
