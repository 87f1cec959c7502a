//! Enrollment number encoding and counter partitions.
//!
//! An enrollment number is the 4-digit admission year, the course code, and a
//! 3-digit zero-padded sequence number, e.g. `2024BCA001`. Sequence numbers
//! are issued per [`Partition`], so each (course code, admission year) pair
//! holds at most [`MAX_SEQUENCE`] students.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::courses::CourseCode;

pub const MIN_SEQUENCE: u32 = 1;
pub const MAX_SEQUENCE: u32 = 999;

/// Canonical textual shape of an enrollment number. ASCII digits only.
pub const ENROLLMENT_NUMBER_PATTERN: &str = r"^([0-9]{4})(BCA|MCA|BBA|MBA|BCOM|MCOM)([0-9]{3})$";

static ENROLLMENT_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ENROLLMENT_NUMBER_PATTERN).expect("enrollment number pattern is valid")
});

/// The scope of one sequence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    pub course_code: CourseCode,
    pub admission_year: i32,
}

impl Partition {
    pub const fn new(course_code: CourseCode, admission_year: i32) -> Self {
        Self {
            course_code,
            admission_year,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.course_code, self.admission_year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentNumberError {
    #[error("sequence number {sequence} is outside 1..=999; partition capacity exhausted")]
    SequenceOutOfRange { sequence: u32 },
    #[error("admission year {year} cannot be written as 4 digits")]
    YearOutOfRange { year: i32 },
    #[error("`{0}` is not a valid enrollment number")]
    Malformed(String),
}

/// A decoded enrollment number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnrollmentNumber {
    pub year: i32,
    pub course_code: CourseCode,
    pub sequence: u32,
}

impl EnrollmentNumber {
    pub fn new(
        year: i32,
        course_code: CourseCode,
        sequence: u32,
    ) -> Result<Self, EnrollmentNumberError> {
        if !(0..=9999).contains(&year) {
            return Err(EnrollmentNumberError::YearOutOfRange { year });
        }
        if !(MIN_SEQUENCE..=MAX_SEQUENCE).contains(&sequence) {
            return Err(EnrollmentNumberError::SequenceOutOfRange { sequence });
        }
        Ok(Self {
            year,
            course_code,
            sequence,
        })
    }

    pub fn partition(&self) -> Partition {
        Partition::new(self.course_code, self.year)
    }
}

impl fmt::Display for EnrollmentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{}{:03}", self.year, self.course_code, self.sequence)
    }
}

impl FromStr for EnrollmentNumber {
    type Err = EnrollmentNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl Serialize for EnrollmentNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Formats an enrollment number, e.g. `format(2024, CourseCode::Bca, 1)` is
/// `"2024BCA001"`. Sequence numbers above [`MAX_SEQUENCE`] are rejected.
pub fn format(
    admission_year: i32,
    course_code: CourseCode,
    sequence: u32,
) -> Result<String, EnrollmentNumberError> {
    EnrollmentNumber::new(admission_year, course_code, sequence).map(|n| n.to_string())
}

/// Parses a canonical enrollment number. Anything that does not match the
/// canonical shape exactly is rejected; sequence `000` is rejected as well
/// since it can never be issued.
pub fn parse(value: &str) -> Result<EnrollmentNumber, EnrollmentNumberError> {
    let malformed = || EnrollmentNumberError::Malformed(value.to_string());

    let captures = ENROLLMENT_NUMBER_RE.captures(value).ok_or_else(malformed)?;
    let year: i32 = captures[1].parse().map_err(|_| malformed())?;
    let course_code: CourseCode = captures[2].parse().map_err(|_| malformed())?;
    let sequence: u32 = captures[3].parse().map_err(|_| malformed())?;

    EnrollmentNumber::new(year, course_code, sequence)
}

/// Returns `true` when `value` has the canonical enrollment number shape.
pub fn is_canonical(value: &str) -> bool {
    ENROLLMENT_NUMBER_RE.is_match(value)
}
