//! Procedural initial conditions for benchmarks and testing.
//!
//! Positions are given in unit-square coordinates: cell `(i, j)` has its
//! centre at `((i - 0.5) h, (j - 0.5) h)` with `h = 1/N`. All generators
//! enforce the matching boundary rule before returning.

use eddy_types::{BoundaryType, EddyResult, GridSize};

use crate::field::Field;

#[inline]
fn cell_centre(grid: GridSize, i: usize, j: usize) -> (f32, f32) {
    let h = grid.spacing();
    ((i as f32 - 0.5) * h, (j as f32 - 0.5) * h)
}

/// Gaussian density blob `amplitude · exp(-r² / (2σ²))`.
///
/// # Example
/// ```
/// use eddy_grid::generators::gaussian_blob;
/// use eddy_types::GridSize;
/// let grid = GridSize::new(16).unwrap();
/// let d = gaussian_blob(grid, 0.5, 0.5, 0.1, 1.0).unwrap();
/// assert!(d.get(8, 8) > d.get(2, 2));
/// ```
pub fn gaussian_blob(
    grid: GridSize,
    cx: f32,
    cy: f32,
    sigma: f32,
    amplitude: f32,
) -> EddyResult<Field> {
    let mut field = Field::zeros(grid);
    let inv = 1.0 / (2.0 * sigma * sigma);
    let n = grid.n();
    for j in 1..=n {
        for i in 1..=n {
            let (x, y) = cell_centre(grid, i, j);
            let r2 = (x - cx) * (x - cx) + (y - cy) * (y - cy);
            field.set(i, j, amplitude * (-r2 * inv).exp());
        }
    }
    field.enforce_boundary(BoundaryType::Scalar)?;
    Ok(field)
}

/// Solid-body rotation inside `radius`, zero outside.
///
/// Returns `(u, v)` with `u = -ω (y - cy)`, `v = ω (x - cx)`.
pub fn solid_body_vortex(
    grid: GridSize,
    cx: f32,
    cy: f32,
    radius: f32,
    omega: f32,
) -> EddyResult<(Field, Field)> {
    let mut u = Field::zeros(grid);
    let mut v = Field::zeros(grid);
    let n = grid.n();
    for j in 1..=n {
        for i in 1..=n {
            let (x, y) = cell_centre(grid, i, j);
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= radius * radius {
                u.set(i, j, -omega * dy);
                v.set(i, j, omega * dx);
            }
        }
    }
    u.enforce_boundary(BoundaryType::VelocityX)?;
    v.enforce_boundary(BoundaryType::VelocityY)?;
    Ok((u, v))
}

/// Sets the interior rectangle `[i0, i1] × [j0, j1]` (inclusive, clamped to
/// `1..=N`) to `value`. Does not touch the ring.
pub fn fill_rect(field: &mut Field, i0: usize, i1: usize, j0: usize, j1: usize, value: f32) {
    let n = field.grid().n();
    for j in j0.max(1)..=j1.min(n) {
        for i in i0.max(1)..=i1.min(n) {
            field.set(i, j, value);
        }
    }
}
