//! labcert-core
//!
//! Pure domain types and report-number conventions. No interpretation
//! logic lives here; this is the shared vocabulary of the labcert engine.

pub mod error;
pub mod models;
pub mod report_numbers;
