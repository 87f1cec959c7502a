//! The admission workflow: validate, allocate, format, persist.
//!
//! Steps run strictly in order and abort on the first error:
//!
//! 1. Replay check when an idempotency key is supplied
//! 2. Resolve the course
//! 3. Validate admission/passout years against the course duration
//! 4. Check the email is not already taken
//! 5. Allocate a sequence number for (course code, admission year)
//! 6. Format the enrollment number
//! 7. Insert the student
//!
//! The allocation in step 5 and the insert in step 7 are separate writes.
//! If the insert fails, or the caller is cancelled between the two, the
//! allocated number is never reused. Such gaps are logged at error level and
//! counted in `enrollment_sequence_gaps_total` for reconciliation.

use std::sync::Arc;

use registrar_config::AdmissionConfig;
use registrar_models::{
    CreateAdmissionDto, NewStudent, Partition, Student, UserId, enrollment, normalize_email,
};
use registrar_observability::{
    track_admission_rejected, track_enrollment_gap, track_student_admitted,
};
use tracing::{error, info, instrument, warn};

use crate::modules::admissions::allocator::SequenceAllocator;
use crate::modules::admissions::error::AdmissionError;
use crate::modules::admissions::store::{
    CounterStore, CourseCatalog, EMAIL_CONSTRAINT, ENROLLMENT_NUMBER_CONSTRAINT,
    IDEMPOTENCY_KEY_CONSTRAINT, StoreError, StudentRecordStore,
};
use crate::modules::admissions::validator::AdmissionValidator;

#[derive(Clone)]
pub struct AdmissionWorkflow {
    validator: AdmissionValidator,
    allocator: SequenceAllocator,
    students: Arc<dyn StudentRecordStore>,
}

impl AdmissionWorkflow {
    pub fn new(
        validator: AdmissionValidator,
        allocator: SequenceAllocator,
        students: Arc<dyn StudentRecordStore>,
    ) -> Self {
        Self {
            validator,
            allocator,
            students,
        }
    }

    /// Wires every collaborator to a single store.
    pub fn from_store<S>(store: Arc<S>, config: AdmissionConfig) -> Self
    where
        S: CourseCatalog + CounterStore + StudentRecordStore + 'static,
    {
        let validator = AdmissionValidator::new(store.clone(), store.clone(), config);
        Self::new(validator, SequenceAllocator::new(store.clone()), store)
    }

    pub fn validator(&self) -> &AdmissionValidator {
        &self.validator
    }

    /// Admits a student and returns the persisted record.
    ///
    /// Not safe to retry blindly: a failed attempt may already have consumed
    /// a sequence number. Supply `idempotency_key` to make retries return the
    /// original record instead of admitting twice.
    #[instrument(
        skip(self, dto),
        fields(course_id = %dto.course_id, admission_year = dto.admission_year)
    )]
    pub async fn create_student_admission(
        &self,
        dto: CreateAdmissionDto,
        created_by: UserId,
    ) -> Result<Student, AdmissionError> {
        let result = self.admit(dto, created_by).await;
        if let Err(err) = &result {
            warn!(kind = err.kind().as_str(), error = %err, "Admission rejected");
            track_admission_rejected(err.kind().as_str());
        }
        result
    }

    async fn admit(
        &self,
        dto: CreateAdmissionDto,
        created_by: UserId,
    ) -> Result<Student, AdmissionError> {
        if let Some(existing) = self.replay(&dto).await? {
            return Ok(existing);
        }

        let course = self.validator.resolve_course(dto.course_id).await?;
        self.validator
            .validate_years(dto.admission_year, dto.passout_year, &course)?;

        let email = normalize_email(dto.email.as_deref());
        self.validator
            .check_email_available(email.as_deref())
            .await?;

        let partition = Partition::new(course.code, dto.admission_year);
        let sequence = self.allocator.allocate(partition).await?;

        let enrollment_number = enrollment::format(dto.admission_year, course.code, sequence)
            .map_err(|_| {
                error!(partition = %partition, sequence, "Enrollment partition is full");
                AdmissionError::CapacityExceeded {
                    partition,
                    sequence,
                }
            })?;

        let new_student = NewStudent {
            enrollment_number: enrollment_number.clone(),
            first_name: dto.first_name.trim().to_string(),
            last_name: dto.last_name.trim().to_string(),
            email,
            course_id: course.id,
            admission_year: dto.admission_year,
            passout_year: dto.passout_year,
            idempotency_key: dto.idempotency_key.clone(),
            created_by,
        };

        match self.students.insert_student(new_student).await {
            Ok(student) => {
                info!(
                    student_id = %student.id,
                    enrollment_number = %student.enrollment_number,
                    "Student admitted"
                );
                track_student_admitted(course.code.as_str());
                Ok(student)
            }
            Err(source) => {
                record_gap(partition, sequence, &enrollment_number, &source);
                self.resolve_insert_failure(&dto, enrollment_number, source)
                    .await
            }
        }
    }

    /// Returns the student previously admitted under the request's
    /// idempotency key, if any.
    async fn replay(&self, dto: &CreateAdmissionDto) -> Result<Option<Student>, AdmissionError> {
        let Some(key) = dto.idempotency_key.as_deref() else {
            return Ok(None);
        };

        let Some(existing) = self
            .students
            .find_by_idempotency_key(key)
            .await
            .map_err(AdmissionError::Lookup)?
        else {
            return Ok(None);
        };

        if existing.course_id != dto.course_id || existing.admission_year != dto.admission_year {
            return Err(AdmissionError::Conflict(
                "Idempotency key was already used for a different admission".to_string(),
            ));
        }

        info!(
            student_id = %existing.id,
            enrollment_number = %existing.enrollment_number,
            "Admission replayed from idempotency key"
        );
        Ok(Some(existing))
    }

    async fn resolve_insert_failure(
        &self,
        dto: &CreateAdmissionDto,
        enrollment_number: String,
        source: StoreError,
    ) -> Result<Student, AdmissionError> {
        if source.violates(EMAIL_CONSTRAINT) {
            return Err(AdmissionError::Conflict(
                "A student with this email already exists".to_string(),
            ));
        }

        if source.violates(ENROLLMENT_NUMBER_CONSTRAINT) {
            return Err(AdmissionError::Conflict(format!(
                "Enrollment number {enrollment_number} is already assigned"
            )));
        }

        // A concurrent request with the same key won the insert.
        if source.violates(IDEMPOTENCY_KEY_CONSTRAINT) {
            if let Some(existing) = self.replay(dto).await? {
                return Ok(existing);
            }
        }

        Err(AdmissionError::PersistenceFailure {
            enrollment_number,
            source,
        })
    }
}

fn record_gap(partition: Partition, sequence: u32, enrollment_number: &str, cause: &StoreError) {
    error!(
        partition = %partition,
        course_code = %partition.course_code,
        admission_year = partition.admission_year,
        sequence,
        enrollment_number,
        error = %cause,
        "Allocated enrollment number was not attached to a student"
    );
    track_enrollment_gap(partition.course_code.as_str());
}
