//! Timestep orchestration.
//!
//! One velocity step and one density step make up a timestep. The ordering
//! below is load-bearing: projection must see the diffused velocity and
//! advection must carry the projected one.
//!
//! ```text
//! vel_step:  diffuse u, diffuse v → swap → project → advect u, v → project
//! dens_step: diffuse ρ → swap → advect ρ
//! ```
//!
//! "Swap" exchanges the storage of the current and previous fields with
//! `std::mem::swap`, which moves two `Vec` headers and no cells.

use eddy_gpu::{GpuBackend, GpuState};
use eddy_grid::Field;
use eddy_types::{BoundaryType, EddyResult};

use crate::advect::Advection;
use crate::linear::diffuse;
use crate::project::project;

/// Advances the velocity by one timestep.
///
/// On entry `u_prev`/`v_prev` hold the velocity to advance (sources
/// already added) and `u`/`v` the initial guess for diffusion. On return
/// `u`/`v` hold the new velocity; `u_prev`/`v_prev` are left as scratch.
///
/// Returns the number of relaxation sweeps executed.
#[allow(clippy::too_many_arguments)]
pub fn vel_step<B: GpuBackend, A: Advection + ?Sized>(
    backend: &B,
    advection: &A,
    u: &mut Field,
    v: &mut Field,
    u_prev: &mut Field,
    v_prev: &mut Field,
    viscosity: f32,
    dt: f32,
    sweeps: u32,
    gpu: &mut GpuState<B::Buffer>,
) -> EddyResult<u32> {
    let mut total = 0;
    total += diffuse(backend, BoundaryType::VelocityX, u, u_prev, viscosity, dt, sweeps, gpu)?;
    total += diffuse(backend, BoundaryType::VelocityY, v, v_prev, viscosity, dt, sweeps, gpu)?;

    // Previous slots now hold the diffused velocity; current slots are scratch.
    std::mem::swap(u, u_prev);
    std::mem::swap(v, v_prev);
    total += project(backend, u_prev, v_prev, u, v, sweeps, gpu)?;

    let (u0, v0) = (&*u_prev, &*v_prev);
    advection.advect(BoundaryType::VelocityX, u, u0, u0, v0, dt)?;
    advection.advect(BoundaryType::VelocityY, v, v0, u0, v0, dt)?;
    total += project(backend, u, v, u_prev, v_prev, sweeps, gpu)?;

    Ok(total)
}

/// Advances the density by one timestep along the velocity `(u, v)`.
///
/// On entry `density_prev` holds the density to advance. On return
/// `density` holds the new density. No projection is applied.
#[allow(clippy::too_many_arguments)]
pub fn dens_step<B: GpuBackend, A: Advection + ?Sized>(
    backend: &B,
    advection: &A,
    density: &mut Field,
    density_prev: &mut Field,
    u: &Field,
    v: &Field,
    diffusion: f32,
    dt: f32,
    sweeps: u32,
    gpu: &mut GpuState<B::Buffer>,
) -> EddyResult<u32> {
    let total = diffuse(
        backend,
        BoundaryType::Scalar,
        density,
        density_prev,
        diffusion,
        dt,
        sweeps,
        gpu,
    )?;

    std::mem::swap(density, density_prev);
    advection.advect(BoundaryType::Scalar, density, density_prev, u, v, dt)?;

    Ok(total)
}
