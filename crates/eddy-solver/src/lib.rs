//! # eddy-solver
//!
//! Stable-fluids time stepping on a uniform square lattice.
//!
//! ## Key Types
//!
//! - [`lin_solve`] — Fixed-count Jacobi relaxation on a device backend
//! - [`diffuse`] / [`project`] — Implicit diffusion and pressure projection
//! - [`vel_step`] / [`dens_step`] — Per-timestep orchestration
//! - [`Advection`] — Pluggable transport ([`SemiLagrangian`])
//! - [`FluidState`] — Current/previous fields and pending sources
//! - [`FluidSolver`] / [`Simulation`] — Owning drivers
//! - [`SolverConfig`] — Resolution, rates, sweep count, backend

pub mod advect;
pub mod config;
pub mod linear;
pub mod project;
pub mod simulation;
pub mod solver;
pub mod state;
pub mod step;

pub use advect::{Advection, SemiLagrangian};
pub use config::{BackendKind, SolverConfig};
pub use linear::{diffuse, lin_solve};
pub use project::project;
pub use simulation::Simulation;
pub use solver::{FluidSolver, StepReport};
pub use state::FluidState;
pub use step::{dens_step, vel_step};
