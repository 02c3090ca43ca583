//! Solver configuration.
//!
//! Parameters that control one run: grid resolution, timestep, the two
//! diffusion rates, the fixed relaxation sweep count, and which device
//! backend executes the sweeps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use eddy_types::constants::{
    DEFAULT_DIFFUSION, DEFAULT_DT, DEFAULT_RELAX_ITERATIONS, DEFAULT_RESOLUTION,
    DEFAULT_VISCOSITY,
};
use eddy_types::{EddyError, EddyResult, GridSize};

/// Which device backend runs relaxation sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Sequential host reference.
    Cpu,
    /// rayon data-parallel host execution.
    #[default]
    Parallel,
    /// WGSL compute via wgpu.
    Wgpu,
}

impl BackendKind {
    /// Returns all backend kinds.
    pub fn all() -> &'static [BackendKind] {
        &[BackendKind::Cpu, BackendKind::Parallel, BackendKind::Wgpu]
    }

    /// Returns the config/CLI spelling.
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Cpu => "cpu",
            BackendKind::Parallel => "parallel",
            BackendKind::Wgpu => "wgpu",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = EddyError;

    fn from_str(s: &str) -> EddyResult<Self> {
        BackendKind::all()
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EddyError::InvalidConfig(format!("Unknown backend '{s}'")))
    }
}

/// Configuration for the fluid solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Interior cells per axis (N).
    pub resolution: u32,

    /// Timestep (seconds).
    pub dt: f32,

    /// Kinematic viscosity used when diffusing velocity.
    pub viscosity: f32,

    /// Diffusion rate of the density field.
    pub diffusion: f32,

    /// Jacobi sweeps per relaxation call. Fixed; there is no residual test.
    pub relax_iterations: u32,

    /// Device backend.
    pub backend: BackendKind,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            dt: DEFAULT_DT,
            viscosity: DEFAULT_VISCOSITY,
            diffusion: DEFAULT_DIFFUSION,
            relax_iterations: DEFAULT_RELAX_ITERATIONS,
            backend: BackendKind::default(),
        }
    }
}

impl SolverConfig {
    /// Creates a config for debugging (small grid, few sweeps, sequential).
    pub fn debug() -> Self {
        Self {
            resolution: 16,
            relax_iterations: 4,
            backend: BackendKind::Cpu,
            ..Default::default()
        }
    }

    /// Creates a high-quality config (finer grid, more sweeps).
    pub fn high_quality() -> Self {
        Self {
            resolution: 256,
            relax_iterations: 80,
            ..Default::default()
        }
    }

    /// Grid geometry for this config.
    pub fn grid(&self) -> EddyResult<GridSize> {
        GridSize::new(self.resolution)
    }

    /// Checks every parameter, failing on the first bad one.
    pub fn validate(&self) -> EddyResult<()> {
        self.grid()?;
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(EddyError::InvalidConfig(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        for (name, rate) in [("viscosity", self.viscosity), ("diffusion", self.diffusion)] {
            if !(rate.is_finite() && rate >= 0.0) {
                return Err(EddyError::InvalidConfig(format!(
                    "{name} must be non-negative and finite, got {rate}"
                )));
            }
        }
        if self.relax_iterations == 0 {
            return Err(EddyError::InvalidConfig(
                "relax_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
