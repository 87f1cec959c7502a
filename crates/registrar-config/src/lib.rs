//! # Registrar Config
//!
//! Configuration types for the Registrar API, loaded from environment variables:
//!
//! - [`admission`]: Admission year window rules
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: HTTP listener address
//!
//! # Example
//!
//! ```ignore
//! use registrar_config::{AdmissionConfig, DatabaseConfig, ServerConfig};
//!
//! let admission = AdmissionConfig::from_env();
//! let database = DatabaseConfig::from_env()?;
//! let server = ServerConfig::from_env();
//! ```

pub mod admission;
pub mod database;
pub mod server;

pub use admission::AdmissionConfig;
pub use database::{DatabaseConfig, DatabaseConfigError};
pub use server::ServerConfig;

pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
