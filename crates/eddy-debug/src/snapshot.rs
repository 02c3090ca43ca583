//! State snapshot serialization for replay and debugging.
//!
//! Snapshots capture the current fields at a point in time, enabling
//! deterministic replay and diff-based debugging.

use std::path::Path;

use serde::{Deserialize, Serialize};

use eddy_grid::Field;
use eddy_solver::FluidState;
use eddy_types::{EddyError, EddyResult, GridSize};

/// Current velocity and density of one run at one timestep.
///
/// Serialized with `bincode` for compact binary output. Previous slots and
/// pending sources are not captured: a step always rebuilds them from the
/// current fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Timestep index when this snapshot was taken.
    pub timestep: u64,
    /// Simulation time in seconds.
    pub sim_time: f64,
    /// Interior resolution N.
    pub resolution: u32,
    /// Flat `(N+2)²` velocity x.
    pub u: Vec<f32>,
    /// Flat `(N+2)²` velocity y.
    pub v: Vec<f32>,
    /// Flat `(N+2)²` density.
    pub density: Vec<f32>,
}

impl StateSnapshot {
    /// Captures the current fields of `state`.
    pub fn capture(state: &FluidState, timestep: u64, sim_time: f64) -> Self {
        Self {
            timestep,
            sim_time,
            resolution: state.grid().n() as u32,
            u: state.u.as_slice().to_vec(),
            v: state.v.as_slice().to_vec(),
            density: state.density.as_slice().to_vec(),
        }
    }

    /// Grid the snapshot was taken on.
    pub fn grid(&self) -> EddyResult<GridSize> {
        GridSize::new(self.resolution)
    }

    /// Rebuilds `(u, v, density)` as fields, checking every length.
    pub fn fields(&self) -> EddyResult<(Field, Field, Field)> {
        let grid = self.grid()?;
        Ok((
            Field::from_data(grid, self.u.clone())?,
            Field::from_data(grid, self.v.clone())?,
            Field::from_data(grid, self.density.clone())?,
        ))
    }

    /// Overwrites the current fields of `state` and clears the rest.
    pub fn restore_into(&self, state: &mut FluidState) -> EddyResult<()> {
        let grid = self.grid()?;
        if grid != state.grid() {
            return Err(EddyError::InvalidGrid(format!(
                "Snapshot has N = {}, state has N = {}",
                grid.n(),
                state.grid().n()
            )));
        }
        let (u, v, density) = self.fields()?;
        state.clear();
        state.u = u;
        state.v = v;
        state.density = density;
        Ok(())
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> EddyResult<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| EddyError::Serialization(format!("Snapshot serialization failed: {e}")))
    }

    /// Deserializes from binary format.
    pub fn from_bytes(data: &[u8]) -> EddyResult<Self> {
        bincode::deserialize(data)
            .map_err(|e| EddyError::Serialization(format!("Snapshot deserialization failed: {e}")))
    }

    /// Writes the binary snapshot to `path`.
    pub fn save(&self, path: &Path) -> EddyResult<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Reads a binary snapshot from `path`.
    pub fn load(path: &Path) -> EddyResult<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}
