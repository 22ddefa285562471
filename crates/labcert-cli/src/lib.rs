//! labcert-cli library root.
//!
//! Exposes the config layer and the table pipeline so integration tests
//! can exercise them without going through argument parsing.

pub mod config;
pub mod pipeline;
