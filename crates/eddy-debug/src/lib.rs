//! # eddy-debug
//!
//! Inspection hooks and state snapshots for debugging simulation issues.
//! Snapshots serialize the current fields to binary for replay and
//! offline inspection.

pub mod hooks;
pub mod snapshot;

pub use hooks::{DivergenceWatch, InspectionHook, TelemetryHook};
pub use snapshot::StateSnapshot;
