use crate::modules::admissions::controller::{create_admission, parse_enrollment_number};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_admissions_router() -> Router<AppState> {
    Router::new().route("/", post(create_admission))
}

pub fn init_enrollment_numbers_router() -> Router<AppState> {
    Router::new().route("/{value}", get(parse_enrollment_number))
}
