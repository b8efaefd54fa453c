//! Report generation over normalized record sets.
//!
//! This module filters each set to the requested date window, computes
//! platform totals and the cross-platform particulars comparison, selects
//! best/least performers, and assembles the final report structure.

pub mod aggregate;
pub mod compose;
pub mod rankings;
pub mod types;

pub use aggregate::{end_of_day, start_of_day};
pub use compose::generate_report;
pub use types::Report;
