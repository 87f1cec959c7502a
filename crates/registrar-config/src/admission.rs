//! Admission year window configuration.
//!
//! Admission and passout years are bounded below by fixed years and above
//! relative to the current calendar year.
//!
//! # Environment Variables
//!
//! - `ADMISSION_EARLIEST_YEAR`: earliest accepted admission year (default: 2020)
//! - `ADMISSION_LOOKAHEAD_YEARS`: admissions allowed up to current year + N (default: 1)
//! - `PASSOUT_EARLIEST_YEAR`: earliest accepted passout year (default: 2021)
//! - `PASSOUT_LOOKAHEAD_YEARS`: passout allowed up to current year + N (default: 10)

use crate::env_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdmissionConfig {
    pub earliest_admission_year: i32,
    pub admission_lookahead_years: i32,
    pub earliest_passout_year: i32,
    pub passout_lookahead_years: i32,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            earliest_admission_year: 2020,
            admission_lookahead_years: 1,
            earliest_passout_year: 2021,
            passout_lookahead_years: 10,
        }
    }
}

impl AdmissionConfig {
    /// Loads the admission window from the environment, falling back to
    /// [`AdmissionConfig::default`] for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            earliest_admission_year: env_or(
                "ADMISSION_EARLIEST_YEAR",
                defaults.earliest_admission_year,
            ),
            admission_lookahead_years: env_or(
                "ADMISSION_LOOKAHEAD_YEARS",
                defaults.admission_lookahead_years,
            ),
            earliest_passout_year: env_or("PASSOUT_EARLIEST_YEAR", defaults.earliest_passout_year),
            passout_lookahead_years: env_or(
                "PASSOUT_LOOKAHEAD_YEARS",
                defaults.passout_lookahead_years,
            ),
        }
    }

    /// Latest admission year accepted when the calendar year is `current_year`.
    pub fn latest_admission_year(&self, current_year: i32) -> i32 {
        current_year + self.admission_lookahead_years
    }

    /// Latest passout year accepted when the calendar year is `current_year`.
    pub fn latest_passout_year(&self, current_year: i32) -> i32 {
        current_year + self.passout_lookahead_years
    }
}
