//! Relaxation solver and diffusion step.
//!
//! [`lin_solve`] approximately solves, for every interior cell,
//!
//! ```text
//! c·x[i,j] = x0[i,j] + a·(x[i-1,j] + x[i+1,j] + x[i,j-1] + x[i,j+1])
//! ```
//!
//! by synchronous Jacobi sweeps. Each sweep reads only the previous
//! sweep's snapshot and writes the other buffer of the pair, so every
//! cell can be updated in parallel. The sweep count is fixed: the cost of
//! a call is deterministic and no residual is ever measured.

use eddy_gpu::{GpuBackend, GpuState};
use eddy_grid::Field;
use eddy_types::{BoundaryType, EddyError, EddyResult, GridSize};

/// Runs `sweeps` Jacobi sweeps on `backend`, overwriting `x`.
///
/// `x` is the initial guess on entry and the relaxed field on return,
/// ring included. `x0` is never modified. `gpu` supplies the scratch
/// pair and the source slot; it is borrowed for the duration of the call
/// only.
///
/// When `a == 0` the stencil vanishes and a single sweep (plus its
/// boundary pass) yields `x = x0/c` exactly.
///
/// Returns the number of sweeps executed.
///
/// # Errors
///
/// Fails before any device work if the fields or the scratch state
/// disagree on the grid, if `a` is non-finite, if `c` is zero or
/// non-finite, or if `sweeps == 0`. Device failures propagate unchanged.
#[allow(clippy::too_many_arguments)]
pub fn lin_solve<B: GpuBackend>(
    backend: &B,
    boundary: BoundaryType,
    x: &mut Field,
    x0: &Field,
    a: f32,
    c: f32,
    sweeps: u32,
    gpu: &mut GpuState<B::Buffer>,
) -> EddyResult<u32> {
    let grid = x.grid();
    check_grids(grid, &[x0.grid(), gpu.grid()])?;
    if !a.is_finite() {
        return Err(EddyError::InvalidConfig(format!(
            "Relaxation coefficient a must be finite, got {a}"
        )));
    }
    if !c.is_finite() || c == 0.0 {
        return Err(EddyError::InvalidConfig(format!(
            "Relaxation coefficient c must be finite and non-zero, got {c}"
        )));
    }
    if sweeps == 0 {
        return Err(EddyError::InvalidConfig(
            "Relaxation needs at least one sweep".into(),
        ));
    }

    let sweeps = if a == 0.0 { 1 } else { sweeps };

    let (pair, source) = gpu.parts_mut();
    backend.upload(x0.as_slice(), source)?;
    backend.upload(x.as_slice(), pair.read_mut())?;
    backend.enforce_boundary(grid, boundary, pair.read_mut())?;

    for _ in 0..sweeps {
        let (read, write) = pair.split();
        backend.relax_sweep(grid, read, source, a, c, write)?;
        backend.enforce_boundary(grid, boundary, write)?;
        pair.swap();
    }

    backend.synchronize()?;
    backend.download(pair.read(), x.as_mut_slice())?;

    tracing::trace!(
        backend = backend.name(),
        boundary = boundary.name(),
        a,
        c,
        sweeps,
        "relaxation solve"
    );
    Ok(sweeps)
}

/// Implicit diffusion of `x0` into `x` at rate `diff` over `dt`.
///
/// `a = dt·diff·N²`, `c = 1 + 4a`, recomputed on every call. `x0` is the
/// previous-timestep field and is left untouched.
#[allow(clippy::too_many_arguments)]
pub fn diffuse<B: GpuBackend>(
    backend: &B,
    boundary: BoundaryType,
    x: &mut Field,
    x0: &Field,
    diff: f32,
    dt: f32,
    sweeps: u32,
    gpu: &mut GpuState<B::Buffer>,
) -> EddyResult<u32> {
    let (a, c) = diffusion_coefficients(x.grid(), diff, dt);
    lin_solve(backend, boundary, x, x0, a, c, sweeps, gpu)
}

/// `(a, c)` for implicit diffusion on `grid`.
pub fn diffusion_coefficients(grid: GridSize, diff: f32, dt: f32) -> (f32, f32) {
    let n = grid.n() as f32;
    let a = dt * diff * n * n;
    (a, 1.0 + 4.0 * a)
}

pub(crate) fn check_grids(expected: GridSize, others: &[GridSize]) -> EddyResult<()> {
    match others.iter().find(|g| **g != expected) {
        Some(g) => Err(EddyError::InvalidGrid(format!(
            "Grid mismatch: N = {} vs N = {}",
            expected.n(),
            g.n()
        ))),
        None => Ok(()),
    }
}
