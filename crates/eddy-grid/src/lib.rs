//! # eddy-grid
//!
//! Host-side representation of the uniform square lattice.
//!
//! ## Key Types
//!
//! - [`Field`] — One scalar quantity over the `(N+2)²` lattice, flat and
//!   row-major so it can be uploaded to a device buffer without reshaping.
//! - [`enforce_boundary`] — The boundary rule shared by every backend.
//! - Procedural initial conditions and diagnostics (divergence, mass, energy).

pub mod boundary;
pub mod diagnostics;
pub mod field;
pub mod generators;

pub use boundary::enforce_boundary;
pub use field::Field;
