//! Course models.
//!
//! Courses are created by administrators ahead of admissions and are treated
//! as immutable by the admission workflow.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, FromRow, Type,
    postgres::PgTypeInfo,
};
use std::fmt;
use std::str::FromStr;

use crate::ids::CourseId;

/// The closed set of course type codes embedded in enrollment numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CourseCode {
    Bca,
    Mca,
    Bba,
    Mba,
    Bcom,
    Mcom,
}

impl CourseCode {
    pub const ALL: [CourseCode; 6] = [
        CourseCode::Bca,
        CourseCode::Mca,
        CourseCode::Bba,
        CourseCode::Mba,
        CourseCode::Bcom,
        CourseCode::Mcom,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            CourseCode::Bca => "BCA",
            CourseCode::Mca => "MCA",
            CourseCode::Bba => "BBA",
            CourseCode::Mba => "MBA",
            CourseCode::Bcom => "BCOM",
            CourseCode::Mcom => "MCOM",
        }
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown course code `{0}`")]
pub struct UnknownCourseCode(pub String);

impl FromStr for CourseCode {
    type Err = UnknownCourseCode;

    /// Matches the canonical uppercase spelling only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CourseCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownCourseCode(s.to_string()))
    }
}

// Stored as TEXT, guarded by a CHECK constraint in the schema.
impl Type<sqlx::Postgres> for CourseCode {
    fn type_info() -> PgTypeInfo {
        <&str as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for CourseCode {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for CourseCode {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

/// A course students can be admitted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Course {
    pub id: CourseId,
    pub code: CourseCode,
    pub name: String,
    pub duration_years: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_code_round_trips_through_str() {
        for code in CourseCode::ALL {
            assert_eq!(code.as_str().parse::<CourseCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_course_code_rejects_lowercase_and_unknown() {
        assert!("bca".parse::<CourseCode>().is_err());
        assert!("BSC".parse::<CourseCode>().is_err());
        assert!("".parse::<CourseCode>().is_err());
    }

    #[test]
    fn test_course_code_serde_uses_uppercase() {
        let json = serde_json::to_string(&CourseCode::Bcom).unwrap();
        assert_eq!(json, r#""BCOM""#);
        let code: CourseCode = serde_json::from_str(r#""MCA""#).unwrap();
        assert_eq!(code, CourseCode::Mca);
    }
}
