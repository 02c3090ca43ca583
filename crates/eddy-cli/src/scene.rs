//! Scene files: a solver config plus run length, outputs, and the
//! sources injected every timestep.
//!
//! ```toml
//! steps = 200
//! snapshot = "plume.bin"
//! events = "plume.jsonl"
//!
//! [solver]
//! resolution = 64
//! dt = 0.1
//! backend = "parallel"
//!
//! [[source]]
//! i = 32
//! j = 2
//! density = 100.0
//! fy = 20.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use eddy_solver::{FluidState, SolverConfig};
use eddy_types::{EddyError, EddyResult};

/// Constant per-second injection at one interior cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub i: usize,
    pub j: usize,
    #[serde(default)]
    pub density: f32,
    #[serde(default)]
    pub fx: f32,
    #[serde(default)]
    pub fy: f32,
}

/// A runnable scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Timesteps to run.
    #[serde(default = "default_steps")]
    pub steps: u32,

    /// Where to write the final state snapshot, if anywhere.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,

    /// Where to write telemetry as JSON lines, if anywhere.
    #[serde(default)]
    pub events: Option<PathBuf>,

    #[serde(default)]
    pub solver: SolverConfig,

    #[serde(default, rename = "source")]
    pub sources: Vec<Source>,
}

fn default_steps() -> u32 {
    100
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            snapshot: None,
            events: None,
            solver: SolverConfig::default(),
            sources: Vec::new(),
        }
    }
}

impl Scene {
    /// Parses a scene from TOML text.
    pub fn from_toml(text: &str) -> EddyResult<Self> {
        toml::from_str(text).map_err(|e| EddyError::Serialization(e.to_string()))
    }

    /// Reads and parses a scene file.
    pub fn load(path: &Path) -> EddyResult<Self> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Checks the solver config and that every source lies in the interior.
    pub fn validate(&self) -> EddyResult<()> {
        self.solver.validate()?;
        let n = self.solver.resolution as usize;
        for (k, s) in self.sources.iter().enumerate() {
            if !(1..=n).contains(&s.i) || !(1..=n).contains(&s.j) {
                return Err(EddyError::InvalidConfig(format!(
                    "source {k} at ({}, {}) is outside the interior 1..={n}",
                    s.i, s.j
                )));
            }
            if !(s.density.is_finite() && s.fx.is_finite() && s.fy.is_finite()) {
                return Err(EddyError::InvalidConfig(format!(
                    "source {k} has a non-finite rate"
                )));
            }
        }
        Ok(())
    }

    /// Queues every source on `state` for the next step.
    pub fn inject(&self, state: &mut FluidState) -> EddyResult<()> {
        for s in &self.sources {
            if s.density != 0.0 {
                state.add_density(s.i, s.j, s.density)?;
            }
            if s.fx != 0.0 || s.fy != 0.0 {
                state.add_velocity(s.i, s.j, s.fx, s.fy)?;
            }
        }
        Ok(())
    }
}
