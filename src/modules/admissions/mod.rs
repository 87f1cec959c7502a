//! Student admission and enrollment numbering.
//!
//! [`service::AdmissionWorkflow`] turns an admission request into a persisted
//! student carrying a unique, sequential enrollment number such as
//! `2024BCA001`. It is built from:
//!
//! - [`validator`]: course, year, and email checks
//! - [`allocator`]: per-(course code, admission year) sequence numbers
//! - [`store`]: persistence traits, implemented by [`postgres`] and [`memory`]

pub mod allocator;
pub mod controller;
pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod router;
pub mod service;
pub mod store;
pub mod validator;
