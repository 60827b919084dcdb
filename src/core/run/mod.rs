pub mod run_service;

pub use run_service::{report_crash, RunService, RunSettings};
