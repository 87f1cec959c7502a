use std::sync::Arc;

use registrar_config::AdmissionConfig;
use registrar_observability::PrometheusHandle;
use sqlx::PgPool;

use crate::modules::admissions::postgres::PgAdmissionStore;
use crate::modules::admissions::service::AdmissionWorkflow;

#[derive(Clone)]
pub struct AppState {
    pub admissions: AdmissionWorkflow,
    pub metrics: Option<PrometheusHandle>,
}

pub fn init_app_state(
    db: PgPool,
    admission_config: AdmissionConfig,
    metrics: Option<PrometheusHandle>,
) -> AppState {
    let store = Arc::new(PgAdmissionStore::new(db));
    AppState {
        admissions: AdmissionWorkflow::from_store(store, admission_config),
        metrics,
    }
}
