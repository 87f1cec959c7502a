//! Admission DTOs.
//!
//! Re-exports the shared models and adds response types used only by the
//! HTTP handlers.

use serde::Serialize;

pub use registrar_models::enrollment::{EnrollmentNumber, Partition};
pub use registrar_models::students::{CreateAdmissionDto, Student};
use registrar_models::CourseCode;

/// Decoded form of an enrollment number.
#[derive(Debug, Serialize)]
pub struct EnrollmentNumberResponse {
    pub enrollment_number: String,
    pub admission_year: i32,
    pub course_code: CourseCode,
    pub sequence: u32,
}

impl From<EnrollmentNumber> for EnrollmentNumberResponse {
    fn from(number: EnrollmentNumber) -> Self {
        Self {
            enrollment_number: number.to_string(),
            admission_year: number.year,
            course_code: number.course_code,
            sequence: number.sequence,
        }
    }
}
