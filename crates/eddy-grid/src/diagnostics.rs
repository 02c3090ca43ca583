//! Field diagnostics used by tests, telemetry, and benchmarks.

use crate::field::Field;

/// Central-difference divergence `∂u/∂x + ∂v/∂y` on interior cells.
///
/// Ring cells of the result are zero. Reads the ring of `u` and `v`, so
/// boundaries must have been enforced first.
pub fn divergence(u: &Field, v: &Field) -> Field {
    let grid = u.grid();
    debug_assert_eq!(grid, v.grid());
    let inv_2h = 0.5 / grid.spacing();

    let mut div = Field::zeros(grid);
    for (i, j) in u.interior() {
        let d = (u.get(i + 1, j) - u.get(i - 1, j) + v.get(i, j + 1) - v.get(i, j - 1)) * inv_2h;
        div.set(i, j, d);
    }
    div
}

/// Largest absolute interior divergence.
pub fn max_abs_divergence(u: &Field, v: &Field) -> f32 {
    divergence(u, v).interior_max_abs()
}

/// Total scalar quantity over the interior (`Σ d·h²`).
pub fn total_mass(density: &Field) -> f64 {
    let h = density.grid().spacing() as f64;
    density.interior_sum() * h * h
}

/// Kinetic energy `½ Σ (u² + v²)·h²` over the interior.
pub fn kinetic_energy(u: &Field, v: &Field) -> f64 {
    let h = u.grid().spacing() as f64;
    let sum: f64 = u
        .interior()
        .map(|(i, j)| {
            let a = u.get(i, j) as f64;
            let b = v.get(i, j) as f64;
            a * a + b * b
        })
        .sum();
    0.5 * sum * h * h
}

/// Largest interior speed `|(u, v)|`.
pub fn max_speed(u: &Field, v: &Field) -> f32 {
    u.interior()
        .map(|(i, j)| {
            let a = u.get(i, j);
            let b = v.get(i, j);
            (a * a + b * b).sqrt()
        })
        .fold(0.0f32, f32::max)
}
