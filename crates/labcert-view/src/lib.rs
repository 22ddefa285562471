//! labcert-view
//!
//! Filtering, ordering and row assembly over unit records, plus the
//! filter options and result statistics derived from the same records.
//! Every function here is pure; callers may run them over any slice of
//! records and get the same rows for the same units.

pub mod filter;
pub mod options;
pub mod sort;
pub mod stats;
pub mod view;
