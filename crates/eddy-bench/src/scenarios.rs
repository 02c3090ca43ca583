//! Benchmark scenarios — initial fields, per-step sources, and config.
//!
//! Three canonical scenarios for regression testing:
//! 1. **Smoke plume** — Density and buoyant force injected at the bottom
//! 2. **Vortex** — Solid-body vortex stirring a density blob
//! 3. **Quiescent blob** — Density blob in still fluid (mass drift check)

use serde::{Deserialize, Serialize};

use eddy_grid::generators::{fill_rect, gaussian_blob, solid_body_vortex};
use eddy_solver::{FluidState, SolverConfig};
use eddy_types::EddyResult;

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Continuous density/force source rising from the bottom wall.
    SmokePlume,
    /// Rotating core advecting an off-centre blob.
    Vortex,
    /// Still fluid holding a diffusing blob.
    QuiescentBlob,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::SmokePlume,
            ScenarioKind::Vortex,
            ScenarioKind::QuiescentBlob,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::SmokePlume => "smoke_plume",
            ScenarioKind::Vortex => "vortex",
            ScenarioKind::QuiescentBlob => "quiescent_blob",
        }
    }

    /// Looks a scenario up by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<ScenarioKind> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// A fully specified benchmark scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario type.
    pub kind: ScenarioKind,
    /// Solver configuration.
    pub config: SolverConfig,
    /// Number of timesteps to simulate.
    pub timesteps: u32,
}

impl Scenario {
    /// Create the smoke plume scenario.
    ///
    /// 64² grid, a 4×2 source patch at the bottom centre injecting density
    /// and upward force every step, 100 steps.
    pub fn smoke_plume() -> Self {
        Self {
            kind: ScenarioKind::SmokePlume,
            config: SolverConfig {
                resolution: 64,
                viscosity: 1.0e-5,
                diffusion: 1.0e-5,
                ..SolverConfig::default()
            },
            timesteps: 100,
        }
    }

    /// Create the vortex scenario.
    ///
    /// 64² grid, solid-body rotation of radius 0.35 with a gaussian blob
    /// placed off-centre inside it, 60 steps, inviscid.
    pub fn vortex() -> Self {
        Self {
            kind: ScenarioKind::Vortex,
            config: SolverConfig {
                resolution: 64,
                ..SolverConfig::default()
            },
            timesteps: 60,
        }
    }

    /// Create the quiescent blob scenario.
    ///
    /// 48² grid, a central blob in still fluid with mild diffusion,
    /// 50 steps. Mass should stay nearly constant.
    pub fn quiescent_blob() -> Self {
        Self {
            kind: ScenarioKind::QuiescentBlob,
            config: SolverConfig {
                resolution: 48,
                diffusion: 1.0e-4,
                ..SolverConfig::default()
            },
            timesteps: 50,
        }
    }

    /// Create a scenario from its kind.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::SmokePlume => Self::smoke_plume(),
            ScenarioKind::Vortex => Self::vortex(),
            ScenarioKind::QuiescentBlob => Self::quiescent_blob(),
        }
    }

    /// Overrides the grid resolution (keeps everything else).
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.config.resolution = resolution;
        self
    }

    /// Writes the initial fields into a zeroed `state`.
    pub fn initialize(&self, state: &mut FluidState) -> EddyResult<()> {
        let grid = state.grid();
        match self.kind {
            ScenarioKind::SmokePlume => Ok(()),
            ScenarioKind::Vortex => {
                let (u, v) = solid_body_vortex(grid, 0.5, 0.5, 0.35, 4.0)?;
                state.u = u;
                state.v = v;
                state.density = gaussian_blob(grid, 0.65, 0.5, 0.06, 1.0)?;
                Ok(())
            }
            ScenarioKind::QuiescentBlob => {
                state.density = gaussian_blob(grid, 0.5, 0.5, 0.1, 1.0)?;
                Ok(())
            }
        }
    }

    /// Queues the sources for `step` (0-indexed) before it runs.
    pub fn inject(&self, state: &mut FluidState, _step: u32) -> EddyResult<()> {
        match self.kind {
            ScenarioKind::SmokePlume => {
                let n = state.grid().n();
                let (i0, i1) = ((n / 2).saturating_sub(1), n / 2 + 2);
                fill_rect(&mut state.density_source, i0, i1, 1, 2, 100.0);
                fill_rect(&mut state.force_y, i0, i1, 1, 2, 20.0);
                Ok(())
            }
            ScenarioKind::Vortex | ScenarioKind::QuiescentBlob => Ok(()),
        }
    }
}
