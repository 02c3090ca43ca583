//! Fluid solver — a backend, an advection scheme, and a config bundled
//! behind one API.

use std::time::Instant;

use eddy_gpu::{GpuBackend, GpuState};
use eddy_grid::Field;
use eddy_types::{BoundaryType, EddyError, EddyResult};

use crate::advect::{Advection, SemiLagrangian};
use crate::config::SolverConfig;
use crate::state::FluidState;
use crate::{linear, project, step};

/// Result of one full timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Relaxation sweeps executed across all solves in the step.
    pub sweeps: u32,
    /// Wall-clock time for the step (seconds).
    pub wall_time: f64,
    /// Largest central-difference divergence after the step.
    pub max_divergence: f32,
    /// Interior density sum `Σ ρ·h²` after the step.
    pub total_density: f64,
    /// Kinetic energy after the step.
    pub kinetic_energy: f64,
}

/// Stable-fluids solver.
///
/// ```text
/// let solver = FluidSolver::new(backend, config)?;
/// let mut gpu = solver.allocate_scratch()?;
/// loop {
///     solver.step(&mut state, &mut gpu)?;
/// }
/// ```
///
/// The solver never holds device scratch itself. Every operation borrows
/// a caller-owned [`GpuState`] for its duration.
pub struct FluidSolver<B: GpuBackend, A: Advection = SemiLagrangian> {
    backend: B,
    advection: A,
    config: SolverConfig,
}

impl<B: GpuBackend> FluidSolver<B> {
    /// Creates a solver with semi-Lagrangian advection.
    ///
    /// Validates `config` and initializes `backend`.
    pub fn new(backend: B, config: SolverConfig) -> EddyResult<Self> {
        Self::with_advection(backend, SemiLagrangian, config)
    }
}

impl<B: GpuBackend, A: Advection> FluidSolver<B, A> {
    /// Creates a solver with a custom advection scheme.
    pub fn with_advection(mut backend: B, advection: A, config: SolverConfig) -> EddyResult<Self> {
        config.validate()?;
        backend.init()?;
        tracing::info!(
            backend = backend.name(),
            gpu = backend.is_gpu(),
            advection = advection.name(),
            n = config.resolution,
            sweeps = config.relax_iterations,
            "fluid solver ready"
        );
        Ok(Self {
            backend,
            advection,
            config,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn advection(&self) -> &A {
        &self.advection
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Allocates relaxation scratch sized for the configured grid.
    pub fn allocate_scratch(&self) -> EddyResult<GpuState<B::Buffer>> {
        GpuState::allocate(&self.backend, self.config.grid()?)
    }

    /// [`linear::lin_solve`] with the configured sweep count.
    pub fn lin_solve(
        &self,
        boundary: BoundaryType,
        x: &mut Field,
        x0: &Field,
        a: f32,
        c: f32,
        gpu: &mut GpuState<B::Buffer>,
    ) -> EddyResult<u32> {
        linear::lin_solve(
            &self.backend,
            boundary,
            x,
            x0,
            a,
            c,
            self.config.relax_iterations,
            gpu,
        )
    }

    /// [`linear::diffuse`] over the configured timestep.
    pub fn diffuse(
        &self,
        boundary: BoundaryType,
        x: &mut Field,
        x0: &Field,
        diff: f32,
        gpu: &mut GpuState<B::Buffer>,
    ) -> EddyResult<u32> {
        linear::diffuse(
            &self.backend,
            boundary,
            x,
            x0,
            diff,
            self.config.dt,
            self.config.relax_iterations,
            gpu,
        )
    }

    /// [`project::project`] with the configured sweep count.
    pub fn project(
        &self,
        u: &mut Field,
        v: &mut Field,
        p: &mut Field,
        div: &mut Field,
        gpu: &mut GpuState<B::Buffer>,
    ) -> EddyResult<u32> {
        project::project(
            &self.backend,
            u,
            v,
            p,
            div,
            self.config.relax_iterations,
            gpu,
        )
    }

    /// Velocity step on `state` with the configured viscosity.
    pub fn vel_step(
        &self,
        state: &mut FluidState,
        gpu: &mut GpuState<B::Buffer>,
    ) -> EddyResult<u32> {
        step::vel_step(
            &self.backend,
            &self.advection,
            &mut state.u,
            &mut state.v,
            &mut state.u_prev,
            &mut state.v_prev,
            self.config.viscosity,
            self.config.dt,
            self.config.relax_iterations,
            gpu,
        )
    }

    /// Density step on `state` with the configured diffusion rate.
    pub fn dens_step(
        &self,
        state: &mut FluidState,
        gpu: &mut GpuState<B::Buffer>,
    ) -> EddyResult<u32> {
        step::dens_step(
            &self.backend,
            &self.advection,
            &mut state.density,
            &mut state.density_prev,
            &state.u,
            &state.v,
            self.config.diffusion,
            self.config.dt,
            self.config.relax_iterations,
            gpu,
        )
    }

    /// Advances `state` by one timestep.
    ///
    /// Folds pending sources into the previous slots, runs the velocity
    /// step, then moves density along the new velocity.
    ///
    /// # Errors
    ///
    /// Fails on a grid mismatch between `state` and the config, on device
    /// failure, or if a field turns non-finite.
    pub fn step(
        &self,
        state: &mut FluidState,
        gpu: &mut GpuState<B::Buffer>,
    ) -> EddyResult<StepReport> {
        let grid = self.config.grid()?;
        if state.grid() != grid {
            return Err(EddyError::InvalidGrid(format!(
                "State has N = {}, solver is configured for N = {}",
                state.grid().n(),
                grid.n()
            )));
        }

        let start = Instant::now();

        state.prepare_step(self.config.dt)?;
        let mut sweeps = self.vel_step(state, gpu)?;
        sweeps += self.dens_step(state, gpu)?;
        state.check_finite()?;

        let report = StepReport {
            sweeps,
            wall_time: start.elapsed().as_secs_f64(),
            max_divergence: state.max_divergence(),
            total_density: state.total_density(),
            kinetic_energy: state.kinetic_energy(),
        };
        tracing::debug!(
            sweeps = report.sweeps,
            wall_time = report.wall_time,
            max_divergence = report.max_divergence,
            "timestep complete"
        );
        Ok(report)
    }
}
