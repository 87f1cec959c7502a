use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use registrar::modules::admissions::allocator::SequenceAllocator;
use registrar::modules::admissions::memory::InMemoryAdmissionStore;
use registrar::modules::admissions::service::AdmissionWorkflow;
use registrar::modules::admissions::validator::AdmissionValidator;
use registrar::router::init_router;
use registrar::state::AppState;
use registrar_config::AdmissionConfig;
use registrar_models::{Course, CourseCode, UserId};
use serde_json::Value;
use uuid::Uuid;

/// Calendar year pinned for every test app, so year windows are stable.
pub const TEST_CURRENT_YEAR: i32 = 2025;

#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub store: Arc<InMemoryAdmissionStore>,
    pub actor: UserId,
}

pub fn setup_test_app() -> TestApp {
    let store = Arc::new(InMemoryAdmissionStore::new());
    let validator =
        AdmissionValidator::new(store.clone(), store.clone(), AdmissionConfig::default())
            .with_current_year(TEST_CURRENT_YEAR);
    let workflow =
        AdmissionWorkflow::new(validator, SequenceAllocator::new(store.clone()), store.clone());

    let state = AppState {
        admissions: workflow,
        metrics: None,
    };

    TestApp {
        router: init_router(state),
        store,
        actor: UserId::new(),
    }
}

#[allow(dead_code)]
pub fn create_test_course(app: &TestApp, code: CourseCode, duration_years: i32) -> Course {
    app.store
        .create_course(code, &format!("{code} programme"), duration_years)
        .unwrap()
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("student_{}@example.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn admission_request(actor: Option<UserId>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/admissions")
        .header("content-type", "application/json");
    if let Some(actor) = actor {
        builder = builder.header("x-actor-id", actor.to_string());
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
