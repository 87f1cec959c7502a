//! Admission checks run before a sequence number is allocated.

use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::Datelike;
use registrar_config::AdmissionConfig;
use registrar_models::{Course, CourseId, enrollment};
use tracing::instrument;

use crate::modules::admissions::error::AdmissionError;
use crate::modules::admissions::store::{CourseCatalog, StudentRecordStore};

type CurrentYear = Arc<dyn Fn() -> i32 + Send + Sync>;

/// Accepted admission and passout years for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearBounds {
    pub admission: RangeInclusive<i32>,
    pub passout: RangeInclusive<i32>,
}

impl YearBounds {
    pub fn new(config: &AdmissionConfig, current_year: i32) -> Self {
        Self {
            admission: config.earliest_admission_year
                ..=config.latest_admission_year(current_year),
            passout: config.earliest_passout_year..=config.latest_passout_year(current_year),
        }
    }
}

#[derive(Clone)]
pub struct AdmissionValidator {
    catalog: Arc<dyn CourseCatalog>,
    students: Arc<dyn StudentRecordStore>,
    config: AdmissionConfig,
    current_year: CurrentYear,
}

impl AdmissionValidator {
    /// Validator whose year window follows the UTC calendar year.
    pub fn new(
        catalog: Arc<dyn CourseCatalog>,
        students: Arc<dyn StudentRecordStore>,
        config: AdmissionConfig,
    ) -> Self {
        Self {
            catalog,
            students,
            config,
            current_year: Arc::new(|| chrono::Utc::now().year()),
        }
    }

    /// Pins the calendar year used for the year window.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Arc::new(move || year);
        self
    }

    pub fn year_bounds(&self) -> YearBounds {
        YearBounds::new(&self.config, (self.current_year)())
    }

    /// Looks up the course. Missing courses are `CourseNotFound`; courses
    /// that no longer accept admissions fail validation.
    #[instrument(skip(self))]
    pub async fn resolve_course(&self, course_id: CourseId) -> Result<Course, AdmissionError> {
        let course = self
            .catalog
            .find_course(course_id)
            .await
            .map_err(AdmissionError::Lookup)?
            .ok_or(AdmissionError::CourseNotFound(course_id))?;

        if !course.is_active {
            return Err(AdmissionError::validation(format!(
                "Course {} ({}) is not accepting admissions",
                course.name, course.code
            )));
        }

        Ok(course)
    }

    /// Checks both years against the configured window and requires
    /// `passout_year - admission_year == course.duration_years`.
    pub fn validate_years(
        &self,
        admission_year: i32,
        passout_year: i32,
        course: &Course,
    ) -> Result<(), AdmissionError> {
        let bounds = self.year_bounds();

        if !bounds.admission.contains(&admission_year) {
            return Err(AdmissionError::validation(format!(
                "Admission year {} must be between {} and {}",
                admission_year,
                bounds.admission.start(),
                bounds.admission.end()
            )));
        }

        if !bounds.passout.contains(&passout_year) {
            return Err(AdmissionError::validation(format!(
                "Passout year {} must be between {} and {}",
                passout_year,
                bounds.passout.start(),
                bounds.passout.end()
            )));
        }

        if passout_year.checked_sub(admission_year) != Some(course.duration_years) {
            let expected = admission_year.saturating_add(course.duration_years);
            return Err(AdmissionError::validation(format!(
                "Passout year {} does not match the {}-year {} course starting in {}; expected {}",
                passout_year, course.duration_years, course.code, admission_year, expected
            )));
        }

        Ok(())
    }

    /// Fails with `Conflict` when any student, including deactivated ones,
    /// already holds `email`. Expects a normalized email.
    #[instrument(skip(self, email))]
    pub async fn check_email_available(&self, email: Option<&str>) -> Result<(), AdmissionError> {
        let Some(email) = email else {
            return Ok(());
        };

        if self
            .students
            .email_exists(email)
            .await
            .map_err(AdmissionError::Lookup)?
        {
            return Err(AdmissionError::Conflict(format!(
                "A student with email {email} already exists"
            )));
        }

        Ok(())
    }

    pub fn validate_format(&self, enrollment_number: &str) -> bool {
        enrollment::is_canonical(enrollment_number)
    }
}
