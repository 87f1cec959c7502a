use crate::modules::admissions::router::{init_admissions_router, init_enrollment_numbers_router};
use crate::state::AppState;
use axum::{Json, Router, middleware, routing::get};
use registrar_observability::{logging_middleware, metrics_middleware};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn init_router(state: AppState) -> Router {
    let metrics_handle = state.metrics.clone();

    let router = Router::new()
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .nest("/admissions", init_admissions_router())
                .nest("/enrollment-numbers", init_enrollment_numbers_router()),
        )
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http());

    match metrics_handle {
        Some(handle) => router.route("/metrics", get(move || async move { handle.render() })),
        None => router,
    }
}
