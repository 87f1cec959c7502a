//! Student domain models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ids::{CourseId, StudentId, UserId};

/// A persisted student record.
///
/// `enrollment_number` is assigned once at admission and never changes.
/// Students are deactivated by flipping `is_active`, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Student {
    pub id: StudentId,
    pub enrollment_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub course_id: CourseId,
    pub admission_year: i32,
    pub passout_year: i32,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub idempotency_key: Option<String>,
    pub created_by: UserId,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for admitting a new student.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdmissionDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub course_id: CourseId,
    pub admission_year: i32,
    pub passout_year: i32,
    /// Client-chosen key making retries of the same admission safe.
    #[validate(length(min = 1, max = 128))]
    pub idempotency_key: Option<String>,
}

/// Insert payload for a student whose enrollment number has been allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub enrollment_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub course_id: CourseId,
    pub admission_year: i32,
    pub passout_year: i32,
    pub idempotency_key: Option<String>,
    pub created_by: UserId,
}

/// Trims and lowercases an email; blank input becomes `None`.
pub fn normalize_email(email: Option<&str>) -> Option<String> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> CreateAdmissionDto {
        CreateAdmissionDto {
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            email: Some("asha@example.com".to_string()),
            course_id: CourseId::new(),
            admission_year: 2024,
            passout_year: 2027,
            idempotency_key: None,
        }
    }

    #[test]
    fn test_create_admission_dto_valid() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_create_admission_dto_without_email() {
        let dto = CreateAdmissionDto {
            email: None,
            ..dto()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_admission_dto_invalid_email() {
        let dto = CreateAdmissionDto {
            email: Some("not-an-email".to_string()),
            ..dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_admission_dto_empty_name() {
        let dto = CreateAdmissionDto {
            first_name: String::new(),
            ..dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_admission_dto_long_idempotency_key() {
        let dto = CreateAdmissionDto {
            idempotency_key: Some("k".repeat(129)),
            ..dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_admission_dto_deserializes() {
        let json = r#"{
            "first_name": "Ravi",
            "last_name": "Kumar",
            "course_id": "12345678-1234-1234-1234-123456789abc",
            "admission_year": 2024,
            "passout_year": 2027
        }"#;
        let dto: CreateAdmissionDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.email, None);
        assert_eq!(dto.idempotency_key, None);
        assert_eq!(dto.admission_year, 2024);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(Some("  Asha@Example.COM ")),
            Some("asha@example.com".to_string())
        );
        assert_eq!(normalize_email(Some("   ")), None);
        assert_eq!(normalize_email(None), None);
    }
}
