use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::is_observability_enabled;

const LOG_DIR: &str = "storage/logs";

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %matched_path,
        "Incoming request"
    );

    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match status {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Request completed"
        ),
    }

    response
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "registrar={default_level},registrar_db={default_level},tower_http=warn,hyper=warn,sqlx=warn"
        ))
    })
}

/// Installs the global tracing subscriber.
///
/// Always logs to the console (level from `RUST_LOG`, else `LOG_LEVEL`, else
/// `info`). When observability is enabled, structured JSON is also written to
/// a daily rolling file under `storage/logs/`. Keep the returned guard alive
/// for the lifetime of the process so buffered lines are flushed.
pub fn init_tracing() -> Option<WorkerGuard> {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter(&level));

    if !is_observability_enabled() {
        tracing_subscriber::registry().with(console_layer).init();
        return None;
    }

    if let Err(err) = std::fs::create_dir_all(LOG_DIR) {
        tracing_subscriber::registry().with(console_layer).init();
        warn!(error = %err, dir = LOG_DIR, "Log directory unavailable, console logging only");
        return None;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "registrar.json");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let json_layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_ansi(false)
        .with_filter(env_filter(&level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .init();

    Some(guard)
}
