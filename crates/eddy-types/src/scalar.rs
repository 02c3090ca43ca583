//! Scalar type alias for the simulation.
//!
//! Every field value, coefficient, and device buffer element is single
//! precision, matching what WGSL compute shaders operate on.

/// The floating-point type used throughout the simulation.
pub type Scalar = f32;
