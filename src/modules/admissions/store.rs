//! Persistence collaborators consumed by the admission workflow.
//!
//! The workflow only depends on these traits. [`PgAdmissionStore`] backs them
//! with PostgreSQL; [`InMemoryAdmissionStore`] keeps everything in process.
//!
//! [`PgAdmissionStore`]: crate::modules::admissions::postgres::PgAdmissionStore
//! [`InMemoryAdmissionStore`]: crate::modules::admissions::memory::InMemoryAdmissionStore

use async_trait::async_trait;
use registrar_models::{Course, CourseId, NewStudent, Partition, Student};

pub const ENROLLMENT_NUMBER_CONSTRAINT: &str = "students_enrollment_number_key";
pub const EMAIL_CONSTRAINT: &str = "students_email_key";
pub const IDEMPOTENCY_KEY_CONSTRAINT: &str = "students_idempotency_key_key";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint `{constraint}` violated")]
    UniqueViolation { constraint: String },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage returned an invalid value: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn unique(constraint: &str) -> Self {
        StoreError::UniqueViolation {
            constraint: constraint.to_string(),
        }
    }

    pub fn violates(&self, constraint: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint: c } if c == constraint)
    }
}

#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn find_course(&self, id: CourseId) -> Result<Option<Course>, StoreError>;
}

/// Atomic per-partition counter.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Creates the partition's counter with value 1 if absent, otherwise
    /// increments it by one, and returns the new value. Must be a single
    /// indivisible operation at the storage layer.
    async fn increment_or_create(&self, partition: &Partition) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait StudentRecordStore: Send + Sync {
    /// Whether any student, active or not, holds `email`.
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Student>, StoreError>;

    /// Inserts a student, enforcing uniqueness of enrollment number, email,
    /// and idempotency key. Violations return [`StoreError::UniqueViolation`]
    /// naming the constraint.
    async fn insert_student(&self, student: NewStudent) -> Result<Student, StoreError>;
}
