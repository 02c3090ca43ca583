//! Advection — transport of a field along the velocity.
//!
//! The step orchestration only depends on the [`Advection`] trait, so the
//! transport scheme can be swapped without touching the relaxation code.

use eddy_grid::Field;
use eddy_types::{BoundaryType, EddyResult};

use crate::linear::check_grids;

/// Trait for advection schemes.
///
/// # Implementations
///
/// - [`SemiLagrangian`] — bilinear backtrace (unconditionally stable)
pub trait Advection: Send + Sync {
    /// Writes into `d` the field `d0` carried along `(u, v)` for `dt`,
    /// then enforces the `boundary` rule on `d`.
    fn advect(
        &self,
        boundary: BoundaryType,
        d: &mut Field,
        d0: &Field,
        u: &Field,
        v: &Field,
        dt: f32,
    ) -> EddyResult<()>;

    /// Returns the scheme's name.
    fn name(&self) -> &str;
}

/// Semi-Lagrangian advection.
///
/// Each interior cell traces back along the velocity by `dt·N` cells,
/// clamps the foot point to `[0.5, N+0.5]` on both axes, and samples `d0`
/// bilinearly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiLagrangian;

impl Advection for SemiLagrangian {
    fn advect(
        &self,
        boundary: BoundaryType,
        d: &mut Field,
        d0: &Field,
        u: &Field,
        v: &Field,
        dt: f32,
    ) -> EddyResult<()> {
        let grid = d.grid();
        check_grids(grid, &[d0.grid(), u.grid(), v.grid()])?;

        let n = grid.n();
        let nf = n as f32;
        let dt0 = dt * nf;

        for j in 1..=n {
            for i in 1..=n {
                let x = (i as f32 - dt0 * u.get(i, j)).clamp(0.5, nf + 0.5);
                let y = (j as f32 - dt0 * v.get(i, j)).clamp(0.5, nf + 0.5);

                let i0 = x.floor() as usize;
                let j0 = y.floor() as usize;
                let s1 = x - i0 as f32;
                let s0 = 1.0 - s1;
                let t1 = y - j0 as f32;
                let t0 = 1.0 - t1;

                let value = s0 * (t0 * d0.get(i0, j0) + t1 * d0.get(i0, j0 + 1))
                    + s1 * (t0 * d0.get(i0 + 1, j0) + t1 * d0.get(i0 + 1, j0 + 1));
                d.set(i, j, value);
            }
        }
        d.enforce_boundary(boundary)
    }

    fn name(&self) -> &str {
        "semi_lagrangian"
    }
}
