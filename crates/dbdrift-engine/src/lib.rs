//! db-drift engine
//!
//! This crate implements the drift computation:
//! - Category-aware object diff (added / removed / modified / unchanged)
//! - Nested column diff for columned objects
//! - Body-hash and definition comparison for executable objects

pub mod columns;
pub mod drift;

pub use columns::diff_columns;
pub use drift::{compute_drift, diff_category, diff_object};
