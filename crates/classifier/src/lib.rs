//! # Salesight Classifier
//!
//! Turns product aggregates into categorical labels: the ABC revenue curve,
//! the revenue/margin quadrant matrix and the per-line loss status.
//!
//! Each classification is a single function returning tagged enums from
//! `core-types`. Empty input always yields an empty result.

pub mod abc;
pub mod quadrant;
pub mod status;

pub use abc::{AbcEntry, AbcSummary, classify_abc};
pub use quadrant::{QuadrantAnalysis, QuadrantEntry, classify_quadrants};
pub use status::{LineStatusEntry, line_status, line_statuses};
