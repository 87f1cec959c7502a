//! # Registrar Core
//!
//! Core types shared by the Registrar API crates.
//!
//! - [`errors`]: HTTP-facing application error with response conversion
//!
//! # Example
//!
//! ```ignore
//! use registrar_core::errors::AppError;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! ```

pub mod errors;

pub use errors::AppError;
