use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use registrar_core::AppError;
use registrar_models::enrollment;
use tracing::instrument;
use validator::Validate;

use crate::middleware::actor::Actor;
use crate::modules::admissions::error::AdmissionError;
use crate::modules::admissions::model::{CreateAdmissionDto, EnrollmentNumberResponse, Student};
use crate::state::AppState;

#[instrument(skip(state, dto))]
pub async fn create_admission(
    State(state): State<AppState>,
    actor: Actor,
    Json(dto): Json<CreateAdmissionDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let student = state
        .admissions
        .create_student_admission(dto, actor.user_id())
        .await
        .map_err(AdmissionError::into_app_error)?;

    Ok((StatusCode::CREATED, Json(student)))
}

#[instrument]
pub async fn parse_enrollment_number(
    Path(value): Path<String>,
) -> Result<Json<EnrollmentNumberResponse>, AppError> {
    let number = enrollment::parse(&value).map_err(AppError::bad_request)?;
    Ok(Json(number.into()))
}
