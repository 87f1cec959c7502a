//! Administrative commands backing the `registrar-cli` binary.

use registrar_models::enrollment::{self, EnrollmentNumberError};
use registrar_models::{Course, CourseCode};
use sqlx::PgPool;

use crate::modules::admissions::postgres::PgAdmissionStore;
use crate::modules::admissions::store::StoreError;

/// Registers a course that students can then be admitted into.
pub async fn create_course(
    db: &PgPool,
    code: CourseCode,
    name: &str,
    duration_years: i32,
) -> Result<Course, StoreError> {
    if duration_years <= 0 {
        return Err(StoreError::InvalidState(format!(
            "course duration must be positive, got {duration_years}"
        )));
    }

    PgAdmissionStore::new(db.clone())
        .create_course(code, name, duration_years)
        .await
}

/// Human-readable breakdown of an enrollment number.
pub fn describe_enrollment_number(value: &str) -> Result<String, EnrollmentNumberError> {
    let number = enrollment::parse(value)?;
    Ok(format!(
        "{number}: admitted {year}, course {code}, sequence {sequence} (partition {partition})",
        year = number.year,
        code = number.course_code,
        sequence = number.sequence,
        partition = number.partition(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_enrollment_number() {
        assert_eq!(
            describe_enrollment_number("2024MCOM017").unwrap(),
            "2024MCOM017: admitted 2024, course MCOM, sequence 17 (partition MCOM/2024)"
        );
    }

    #[test]
    fn test_describe_rejects_garbage() {
        assert!(describe_enrollment_number("2024XYZ001").is_err());
    }
}
