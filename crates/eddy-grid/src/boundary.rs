//! Boundary enforcer.
//!
//! Overwrites the one-cell ring from the adjacent interior values:
//!
//! ```text
//! Scalar     edges copy the interior neighbour
//! VelocityX  i = 0, N+1 negate;  j = 0, N+1 copy
//! VelocityY  j = 0, N+1 negate;  i = 0, N+1 copy
//! corners    average of the two adjacent edge cells
//! ```
//!
//! Every backend must produce exactly these values. Must run after every
//! write to a field that is later read by a relaxation sweep or by
//! advection, because the 4-neighbour stencil reads the ring.

use eddy_types::{BoundaryType, EddyResult, GridSize};

/// Applies the edge rule for `boundary` to a flat `(N+2)²` field.
///
/// Edges are written first, then corners, so corners see the final edge
/// values. The pass only reads interior cells and edge cells it has already
/// written, which makes it idempotent.
pub fn enforce_boundary(grid: GridSize, boundary: BoundaryType, x: &mut [f32]) -> EddyResult<()> {
    grid.check_len(x.len(), "boundary target")?;
    enforce_edges(grid, boundary, x);
    enforce_corners(grid, x);
    Ok(())
}

/// Writes the four edges for `k ∈ 1..=N`.
pub(crate) fn enforce_edges(grid: GridSize, boundary: BoundaryType, x: &mut [f32]) {
    let n = grid.n();
    let sx = if boundary.negates_x_walls() { -1.0 } else { 1.0 };
    let sy = if boundary.negates_y_walls() { -1.0 } else { 1.0 };

    for k in 1..=n {
        x[grid.index(0, k)] = sx * x[grid.index(1, k)];
        x[grid.index(n + 1, k)] = sx * x[grid.index(n, k)];
        x[grid.index(k, 0)] = sy * x[grid.index(k, 1)];
        x[grid.index(k, n + 1)] = sy * x[grid.index(k, n)];
    }
}

/// Sets each corner to the mean of its two edge neighbours.
pub(crate) fn enforce_corners(grid: GridSize, x: &mut [f32]) {
    let e = grid.n() + 1;

    x[grid.index(0, 0)] = 0.5 * (x[grid.index(1, 0)] + x[grid.index(0, 1)]);
    x[grid.index(0, e)] = 0.5 * (x[grid.index(1, e)] + x[grid.index(0, e - 1)]);
    x[grid.index(e, 0)] = 0.5 * (x[grid.index(e - 1, 0)] + x[grid.index(e, 1)]);
    x[grid.index(e, e)] = 0.5 * (x[grid.index(e - 1, e)] + x[grid.index(e, e - 1)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_after_edges() {
        let grid = GridSize::new(1).unwrap();
        // 3×3 lattice, single interior cell at (1,1).
        let mut x = vec![0.0; 9];
        x[grid.index(1, 1)] = 2.0;
        enforce_boundary(grid, BoundaryType::VelocityX, &mut x).unwrap();

        assert_eq!(x[grid.index(0, 1)], -2.0);
        assert_eq!(x[grid.index(2, 1)], -2.0);
        assert_eq!(x[grid.index(1, 0)], 2.0);
        assert_eq!(x[grid.index(1, 2)], 2.0);
        // Each corner averages one negated and one copied edge.
        assert_eq!(x[grid.index(0, 0)], 0.0);
        assert_eq!(x[grid.index(2, 2)], 0.0);
    }
}
