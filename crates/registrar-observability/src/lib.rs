//! Registrar observability.
//!
//! - [`logging`]: tracing subscriber setup and HTTP request logging middleware
//! - [`metrics`]: Prometheus exporter and admission business counters
//!
//! Both can be switched off at runtime with `OBSERVABILITY_ENABLED=false`, in
//! which case only console logging is installed and metric helpers are no-ops.
//!
//! ```no_run
//! use registrar_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() {
//!     let _guard = init_tracing();
//!     let _handle = init_metrics();
//! }
//! ```

use std::sync::OnceLock;

pub mod logging;
pub mod metrics;

pub use logging::{init_tracing, logging_middleware};
pub use metrics::{
    init_metrics, metrics_middleware, track_admission_rejected, track_enrollment_gap,
    track_student_admitted,
};
pub use metrics_exporter_prometheus::PrometheusHandle;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Reads `OBSERVABILITY_ENABLED` once; enabled unless set to `false` or `0`.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}
