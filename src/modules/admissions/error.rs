//! Admission error taxonomy.
//!
//! Every step of the admission workflow returns one of these variants
//! directly to its caller; nothing is retried internally.

use registrar_core::AppError;
use registrar_models::{CourseId, Partition};

use crate::modules::admissions::store::StoreError;

/// Coarse classification of [`AdmissionError`] for callers that only need
/// to branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionErrorKind {
    NotFound,
    Validation,
    Conflict,
    AllocationFailure,
    CapacityExceeded,
    PersistenceFailure,
    /// A store read failed before any sequence number was allocated.
    Unavailable,
}

impl AdmissionErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AdmissionErrorKind::NotFound => "not_found",
            AdmissionErrorKind::Validation => "validation",
            AdmissionErrorKind::Conflict => "conflict",
            AdmissionErrorKind::AllocationFailure => "allocation_failure",
            AdmissionErrorKind::CapacityExceeded => "capacity_exceeded",
            AdmissionErrorKind::PersistenceFailure => "persistence_failure",
            AdmissionErrorKind::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("Course {0} not found")]
    CourseNotFound(CourseId),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Could not allocate an enrollment sequence for {partition}: {source}")]
    AllocationFailure {
        partition: Partition,
        #[source]
        source: StoreError,
    },

    #[error("Enrollment capacity for {partition} is exhausted (sequence {sequence} exceeds 999)")]
    CapacityExceeded { partition: Partition, sequence: u32 },

    #[error("Failed to persist student {enrollment_number}: {source}")]
    PersistenceFailure {
        enrollment_number: String,
        #[source]
        source: StoreError,
    },

    /// A read against the store failed before any number was allocated.
    #[error("Admission lookup failed: {0}")]
    Lookup(#[source] StoreError),
}

impl AdmissionError {
    pub fn validation(reason: impl Into<String>) -> Self {
        AdmissionError::Validation(reason.into())
    }

    pub fn kind(&self) -> AdmissionErrorKind {
        match self {
            AdmissionError::CourseNotFound(_) => AdmissionErrorKind::NotFound,
            AdmissionError::Validation(_) => AdmissionErrorKind::Validation,
            AdmissionError::Conflict(_) => AdmissionErrorKind::Conflict,
            AdmissionError::AllocationFailure { .. } => AdmissionErrorKind::AllocationFailure,
            AdmissionError::CapacityExceeded { .. } => AdmissionErrorKind::CapacityExceeded,
            AdmissionError::PersistenceFailure { .. } => AdmissionErrorKind::PersistenceFailure,
            AdmissionError::Lookup(_) => AdmissionErrorKind::Unavailable,
        }
    }
}

impl AdmissionError {
    /// Maps the error onto an HTTP status. `AppError`'s blanket `From` would
    /// turn every variant into a 500, so handlers call this explicitly.
    pub fn into_app_error(self) -> AppError {
        match self.kind() {
            AdmissionErrorKind::NotFound => AppError::not_found(self),
            AdmissionErrorKind::Validation => AppError::unprocessable(self),
            AdmissionErrorKind::Conflict | AdmissionErrorKind::CapacityExceeded => {
                AppError::conflict(self)
            }
            AdmissionErrorKind::AllocationFailure | AdmissionErrorKind::Unavailable => {
                AppError::service_unavailable(self)
            }
            AdmissionErrorKind::PersistenceFailure => AppError::internal(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use registrar_models::CourseCode;

    #[test]
    fn test_kind_and_status_mapping() {
        let partition = Partition::new(CourseCode::Bca, 2024);
        let cases = [
            (
                AdmissionError::CourseNotFound(CourseId::new()),
                StatusCode::NOT_FOUND,
            ),
            (
                AdmissionError::validation("bad years"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AdmissionError::Conflict("taken".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                AdmissionError::CapacityExceeded {
                    partition,
                    sequence: 1000,
                },
                StatusCode::CONFLICT,
            ),
            (
                AdmissionError::AllocationFailure {
                    partition,
                    source: StoreError::Unavailable("down".to_string()),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AdmissionError::PersistenceFailure {
                    enrollment_number: "2024BCA001".to_string(),
                    source: StoreError::Unavailable("down".to_string()),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AdmissionError::Lookup(StoreError::Unavailable("down".to_string())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            let app_error = err.into_app_error();
            assert_eq!(app_error.status, status);
        }
    }

    #[test]
    fn test_messages_carry_detail() {
        let err = AdmissionError::CapacityExceeded {
            partition: Partition::new(CourseCode::Mba, 2025),
            sequence: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Enrollment capacity for MBA/2025 is exhausted (sequence 1000 exceeds 999)"
        );
        assert_eq!(err.kind().as_str(), "capacity_exceeded");
    }
}
