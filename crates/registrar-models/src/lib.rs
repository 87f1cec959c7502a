//! # Registrar Models
//!
//! Domain models and DTOs for the Registrar API.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed UUID identifiers
//! - [`courses`]: Courses and the closed set of course codes
//! - [`enrollment`]: Enrollment number encoding, decoding, and counter partitions
//! - [`students`]: Student records and the admission request DTO
//!
//! # Example
//!
//! ```ignore
//! use registrar_models::courses::CourseCode;
//! use registrar_models::enrollment;
//!
//! let number = enrollment::format(2024, CourseCode::Bca, 1)?;
//! assert_eq!(number, "2024BCA001");
//! ```

pub mod courses;
pub mod enrollment;
pub mod ids;
pub mod students;

pub use courses::{Course, CourseCode};
pub use enrollment::{EnrollmentNumber, EnrollmentNumberError, Partition};
pub use ids::{CourseId, StudentId, UserId};
pub use students::{CreateAdmissionDto, NewStudent, Student, normalize_email};
