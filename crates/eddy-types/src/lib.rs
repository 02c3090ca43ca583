//! # eddy-types
//!
//! Shared types, grid geometry, boundary tags, error types, and numeric
//! defaults for the eddy stable-fluids solver.
//!
//! This crate has zero solver logic — it defines the vocabulary
//! that all other eddy crates share.

pub mod boundary;
pub mod constants;
pub mod error;
pub mod grid;
pub mod scalar;

pub use boundary::BoundaryType;
pub use error::{EddyError, EddyResult};
pub use grid::GridSize;
pub use scalar::Scalar;
