//! labcert-export
//!
//! Flattens a view into a header row plus text rows. Disease cells go
//! through the same `render_cell` as the on-screen table.

pub mod columns;
pub mod error;
pub mod projection;
