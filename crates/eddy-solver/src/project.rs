//! Pressure projection.
//!
//! Removes the gradient part of the velocity field: the central-difference
//! divergence becomes the source of a pressure Poisson equation, which is
//! relaxed with the same Jacobi solver used for diffusion, and the
//! pressure gradient is subtracted from the velocity.

use eddy_gpu::{GpuBackend, GpuState};
use eddy_grid::Field;
use eddy_types::{BoundaryType, EddyResult};

use crate::linear::{check_grids, lin_solve};

/// Projects `(u, v)` towards zero divergence.
///
/// `p` and `div` are scratch fields; their contents on entry are ignored
/// and on return hold the pressure and the pre-projection divergence
/// source. Returns the number of relaxation sweeps executed.
pub fn project<B: GpuBackend>(
    backend: &B,
    u: &mut Field,
    v: &mut Field,
    p: &mut Field,
    div: &mut Field,
    sweeps: u32,
    gpu: &mut GpuState<B::Buffer>,
) -> EddyResult<u32> {
    let grid = u.grid();
    check_grids(grid, &[v.grid(), p.grid(), div.grid(), gpu.grid()])?;

    let n = grid.n();
    let h = grid.spacing();

    for j in 1..=n {
        for i in 1..=n {
            let d = -0.5
                * h
                * (u.get(i + 1, j) - u.get(i - 1, j) + v.get(i, j + 1) - v.get(i, j - 1));
            div.set(i, j, d);
            p.set(i, j, 0.0);
        }
    }
    div.enforce_boundary(BoundaryType::Scalar)?;
    p.enforce_boundary(BoundaryType::Scalar)?;

    let sweeps = lin_solve(backend, BoundaryType::Scalar, p, div, 1.0, 4.0, sweeps, gpu)?;

    for j in 1..=n {
        for i in 1..=n {
            u.add(i, j, -0.5 * (p.get(i + 1, j) - p.get(i - 1, j)) / h);
            v.add(i, j, -0.5 * (p.get(i, j + 1) - p.get(i, j - 1)) / h);
        }
    }
    u.enforce_boundary(BoundaryType::VelocityX)?;
    v.enforce_boundary(BoundaryType::VelocityY)?;

    Ok(sweeps)
}
