//! Per-href history chains.

pub mod tracker;

pub use tracker::{PurgeStats, VersionTracker};
