//! Simulation driver — owns the solver, the state, and the scratch for
//! the lifetime of a run.

use eddy_gpu::{GpuBackend, GpuState};
use eddy_types::EddyResult;

use crate::advect::{Advection, SemiLagrangian};
use crate::config::SolverConfig;
use crate::solver::{FluidSolver, StepReport};
use crate::state::FluidState;

/// A running simulation.
///
/// The scratch pair is allocated once here and lent to every solve, so
/// steady-state stepping allocates no device memory.
pub struct Simulation<B: GpuBackend, A: Advection = SemiLagrangian> {
    solver: FluidSolver<B, A>,
    state: FluidState,
    scratch: GpuState<B::Buffer>,
    timestep: u64,
    time: f64,
}

impl<B: GpuBackend> Simulation<B> {
    /// Creates a quiescent simulation on `backend`.
    pub fn new(backend: B, config: SolverConfig) -> EddyResult<Self> {
        Self::from_solver(FluidSolver::new(backend, config)?)
    }
}

impl<B: GpuBackend, A: Advection> Simulation<B, A> {
    /// Wraps an existing solver with a zeroed state.
    pub fn from_solver(solver: FluidSolver<B, A>) -> EddyResult<Self> {
        let grid = solver.config().grid()?;
        let scratch = solver.allocate_scratch()?;
        Ok(Self {
            solver,
            state: FluidState::new(grid),
            scratch,
            timestep: 0,
            time: 0.0,
        })
    }

    pub fn solver(&self) -> &FluidSolver<B, A> {
        &self.solver
    }

    pub fn state(&self) -> &FluidState {
        &self.state
    }

    /// Mutable state, for injecting sources or initial conditions.
    pub fn state_mut(&mut self) -> &mut FluidState {
        &mut self.state
    }

    /// Completed timesteps.
    pub fn timestep(&self) -> u64 {
        self.timestep
    }

    /// Simulated time (seconds).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advances one timestep.
    pub fn step(&mut self) -> EddyResult<StepReport> {
        let report = self.solver.step(&mut self.state, &mut self.scratch)?;
        self.timestep += 1;
        self.time += self.solver.config().dt as f64;
        Ok(report)
    }

    /// Advances `steps` timesteps, collecting one report per step.
    pub fn run(&mut self, steps: u32) -> EddyResult<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            reports.push(self.step()?);
        }
        Ok(reports)
    }

    /// Zeroes the state and the clock.
    pub fn reset(&mut self) {
        self.state.clear();
        self.timestep = 0;
        self.time = 0.0;
    }
}
