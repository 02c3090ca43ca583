//! Fluid state — the authoritative current/previous fields of one run.
//!
//! The solver reads and writes these fields each timestep. Every quantity
//! has a current and a previous slot; the steps relabel the two by
//! swapping the fields' storage, never by copying cells.

use eddy_grid::diagnostics::{kinetic_energy, max_abs_divergence, total_mass};
use eddy_grid::Field;
use eddy_types::{EddyError, EddyResult, GridSize};

/// Host-resident fields for one simulation.
///
/// # Layout
///
/// Every field is a flat `(N+2)²` array indexed `i + (N+2)*j`:
/// ```text
/// u, v           velocity (current)
/// u_prev, v_prev velocity (previous / source)
/// density        passive scalar (current)
/// density_prev   passive scalar (previous / source)
/// ```
/// The three accumulators collect user injections between steps and are
/// folded into the previous slots by [`prepare_step`](Self::prepare_step).
#[derive(Debug, Clone)]
pub struct FluidState {
    grid: GridSize,

    // ─── Velocity ───
    pub u: Field,
    pub v: Field,
    pub u_prev: Field,
    pub v_prev: Field,

    // ─── Density ───
    pub density: Field,
    pub density_prev: Field,

    // ─── Pending sources (cleared every step) ───
    pub force_x: Field,
    pub force_y: Field,
    pub density_source: Field,
}

impl FluidState {
    /// All-zero state on `grid`.
    pub fn new(grid: GridSize) -> Self {
        let zero = Field::zeros(grid);
        Self {
            grid,
            u: zero.clone(),
            v: zero.clone(),
            u_prev: zero.clone(),
            v_prev: zero.clone(),
            density: zero.clone(),
            density_prev: zero.clone(),
            force_x: zero.clone(),
            force_y: zero.clone(),
            density_source: zero,
        }
    }

    /// Grid shared by every field.
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Queues a density injection (per second) at interior cell `(i, j)`.
    pub fn add_density(&mut self, i: usize, j: usize, amount: f32) -> EddyResult<()> {
        self.check_interior(i, j)?;
        self.density_source.add(i, j, amount);
        Ok(())
    }

    /// Queues a force (per second) at interior cell `(i, j)`.
    pub fn add_velocity(&mut self, i: usize, j: usize, fx: f32, fy: f32) -> EddyResult<()> {
        self.check_interior(i, j)?;
        self.force_x.add(i, j, fx);
        self.force_y.add(i, j, fy);
        Ok(())
    }

    /// Loads the previous slots for a new timestep.
    ///
    /// `prev = current + dt·source` for every quantity, after which the
    /// source accumulators are cleared. The steps then diffuse from
    /// `prev` into `current`.
    pub fn prepare_step(&mut self, dt: f32) -> EddyResult<()> {
        fold_source(&mut self.u_prev, &self.u, &mut self.force_x, dt)?;
        fold_source(&mut self.v_prev, &self.v, &mut self.force_y, dt)?;
        fold_source(
            &mut self.density_prev,
            &self.density,
            &mut self.density_source,
            dt,
        )
    }

    /// Zeroes every field, sources included.
    pub fn clear(&mut self) {
        for f in [
            &mut self.u,
            &mut self.v,
            &mut self.u_prev,
            &mut self.v_prev,
            &mut self.density,
            &mut self.density_prev,
            &mut self.force_x,
            &mut self.force_y,
            &mut self.density_source,
        ] {
            f.fill(0.0);
        }
    }

    /// Total density over the interior, `Σ ρ·h²`.
    pub fn total_density(&self) -> f64 {
        total_mass(&self.density)
    }

    /// `0.5·Σ(u² + v²)·h²` over the interior.
    pub fn kinetic_energy(&self) -> f64 {
        kinetic_energy(&self.u, &self.v)
    }

    /// Largest central-difference divergence of the current velocity.
    pub fn max_divergence(&self) -> f32 {
        max_abs_divergence(&self.u, &self.v)
    }

    /// Fails if any current field holds NaN or infinity.
    pub fn check_finite(&self) -> EddyResult<()> {
        for (name, f) in [("u", &self.u), ("v", &self.v), ("density", &self.density)] {
            if !f.is_finite() {
                return Err(EddyError::InvariantViolation(format!(
                    "Field '{name}' contains non-finite values"
                )));
            }
        }
        Ok(())
    }

    fn check_interior(&self, i: usize, j: usize) -> EddyResult<()> {
        let n = self.grid.n();
        if i == 0 || j == 0 || i > n || j > n {
            return Err(EddyError::InvalidGrid(format!(
                "Cell ({i}, {j}) is outside the interior 1..={n}"
            )));
        }
        Ok(())
    }
}

fn fold_source(prev: &mut Field, current: &Field, source: &mut Field, dt: f32) -> EddyResult<()> {
    prev.copy_from(current)?;
    prev.add_scaled(source, dt)?;
    source.fill(0.0);
    Ok(())
}
