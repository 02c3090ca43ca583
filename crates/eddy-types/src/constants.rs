//! Numeric defaults for the stable-fluids solver.

/// Default simulation timestep (seconds).
pub const DEFAULT_DT: f32 = 0.1;

/// Default number of Jacobi relaxation sweeps per `lin_solve` call.
///
/// Termination is purely count-based. Raising this trades latency for a
/// smaller residual; there is no convergence check.
pub const DEFAULT_RELAX_ITERATIONS: u32 = 20;

/// Default interior grid resolution `N` (the lattice is `(N+2)²` with the ring).
pub const DEFAULT_RESOLUTION: u32 = 64;

/// Largest accepted interior resolution `N`.
///
/// One `(N+2)²` field at this size is about 256 MiB of `f32`; a step holds
/// nine of them plus three scratch buffers.
pub const MAX_RESOLUTION: u32 = 8192;

/// Default kinematic viscosity for velocity diffusion.
pub const DEFAULT_VISCOSITY: f32 = 0.0;

/// Default diffusion rate for the density field.
pub const DEFAULT_DIFFUSION: f32 = 0.0;

/// Width of the boundary ring around the interior, per side.
pub const BOUNDARY_RING: u32 = 1;

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-6;
