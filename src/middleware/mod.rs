//! Request extractors.
//!
//! - [`actor`]: identifies the acting user from the gateway-supplied header

pub mod actor;
