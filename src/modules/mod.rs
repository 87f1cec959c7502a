pub mod admissions;

pub use self::admissions::service::AdmissionWorkflow;
