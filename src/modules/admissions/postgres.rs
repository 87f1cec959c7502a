//! PostgreSQL admission store.
//!
//! The counter increment is a single `INSERT ... ON CONFLICT DO UPDATE ...
//! RETURNING` statement. The row lock it takes lasts only for that statement,
//! so allocations in one partition serialize without blocking other
//! partitions and no lock is held while the student row is inserted.

use async_trait::async_trait;
use registrar_models::{Course, CourseCode, CourseId, NewStudent, Partition, Student};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::admissions::store::{
    CounterStore, CourseCatalog, StoreError, StudentRecordStore,
};

const STUDENT_COLUMNS: &str = "id, enrollment_number, first_name, last_name, email, course_id, \
     admission_year, passout_year, is_active, idempotency_key, created_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgAdmissionStore {
    db: PgPool,
}

impl PgAdmissionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    #[instrument(skip(self))]
    pub async fn create_course(
        &self,
        code: CourseCode,
        name: &str,
        duration_years: i32,
    ) -> Result<Course, StoreError> {
        let course = sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (code, name, duration_years)
               VALUES ($1, $2, $3)
               RETURNING id, code, name, duration_years, is_active, created_at"#,
        )
        .bind(code)
        .bind(name)
        .bind(duration_years)
        .fetch_one(&self.db)
        .await?;

        Ok(course)
    }
}

/// Maps unique-violation errors onto [`StoreError::UniqueViolation`] so
/// callers can branch on the constraint name.
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::unique(db_err.constraint().unwrap_or("unknown"));
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl CourseCatalog for PgAdmissionStore {
    #[instrument(skip(self))]
    async fn find_course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(
            r#"SELECT id, code, name, duration_years, is_active, created_at
               FROM courses WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(course)
    }
}

#[async_trait]
impl CounterStore for PgAdmissionStore {
    #[instrument(skip(self, partition), fields(partition = %partition))]
    async fn increment_or_create(&self, partition: &Partition) -> Result<i64, StoreError> {
        let value = sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO enrollment_counters (course_code, admission_year, last_number)
               VALUES ($1, $2, 1)
               ON CONFLICT (course_code, admission_year)
               DO UPDATE SET last_number = enrollment_counters.last_number + 1,
                             updated_at = NOW()
               RETURNING last_number"#,
        )
        .bind(partition.course_code)
        .bind(partition.admission_year)
        .fetch_one(&self.db)
        .await?;

        Ok(value)
    }
}

#[async_trait]
impl StudentRecordStore for PgAdmissionStore {
    #[instrument(skip(self, email))]
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.db)
                .await?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE idempotency_key = $1"
        ))
        .bind(key)
        .fetch_optional(&self.db)
        .await?;

        Ok(student)
    }

    #[instrument(skip(self, student), fields(enrollment_number = %student.enrollment_number))]
    async fn insert_student(&self, student: NewStudent) -> Result<Student, StoreError> {
        sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students (enrollment_number, first_name, last_name, email, course_id,
                                     admission_year, passout_year, idempotency_key, created_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(&student.enrollment_number)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(student.course_id)
        .bind(student.admission_year)
        .bind(student.passout_year)
        .bind(&student.idempotency_key)
        .bind(student.created_by)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)
    }
}
