//! Tests for the application bootstrap, covering readiness signalling and
//! the assembled route table.

use std::net::SocketAddr;
use std::sync::Arc;

use super::server::{ServerConfig, build_app, create_server};
use actix_web::http::{StatusCode, header};
use actix_web::test as actix_test;
use actix_web::web;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::TempDir;
use user_registry::domain::{TRACE_ID_HEADER, UserRegistryService};
use user_registry::inbound::http::health::HealthState;
use user_registry::inbound::http::state::HttpState;
use user_registry::outbound::persistence::JsonFileUserStore;

struct Fixture {
    _dir: TempDir,
    http_state: HttpState,
}

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn registry() -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = JsonFileUserStore::open(dir.path().join("users.json")).expect("open store");
    Fixture {
        _dir: dir,
        http_state: HttpState::from_registry(Arc::new(UserRegistryService::new(store))),
    }
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

#[rstest]
#[actix_web::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    registry: Fixture,
    bind_address: SocketAddr,
) {
    assert!(!health_state.is_ready(), "state should start unready");

    let config = ServerConfig::new(bind_address, registry.http_state.clone());
    assert_eq!(config.bind_addr(), bind_address);
    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_web::test]
async fn assembled_app_serves_users_with_trace_headers(
    health_state: web::Data<HealthState>,
    registry: Fixture,
) {
    let app = actix_test::init_service(build_app(
        health_state,
        web::Data::new(registry.http_state.clone()),
    ))
    .await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "name": "Ann", "email": "Ann@X.com", "role": "admin" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert!(created.headers().contains_key(TRACE_ID_HEADER));

    let listed = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/users").to_request()).await;
    assert_eq!(
        listed
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok()),
        Some("no-store")
    );
    let body: Value = actix_test::read_body_json(listed).await;
    assert_eq!(
        body,
        json!([{ "id": 1, "name": "Ann", "email": "ann@x.com", "role": "admin" }])
    );
}

#[rstest]
#[actix_web::test]
async fn error_payloads_carry_the_response_trace_id(
    health_state: web::Data<HealthState>,
    registry: Fixture,
) {
    let app = actix_test::init_service(build_app(
        health_state,
        web::Data::new(registry.http_state.clone()),
    ))
    .await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/users/99").to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["traceId"], header.as_str());
}

#[rstest]
#[actix_web::test]
async fn malformed_json_body_is_rejected_with_error_payload(
    health_state: web::Data<HealthState>,
    registry: Fixture,
) {
    let app = actix_test::init_service(build_app(
        health_state,
        web::Data::new(registry.http_state.clone()),
    ))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"name\": ")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}
