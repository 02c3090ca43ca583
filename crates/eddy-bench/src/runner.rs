//! Benchmark runner — executes scenarios on a backend and collects metrics.

use std::time::Instant;

use eddy_debug::hooks::InspectionHook;
use eddy_gpu::GpuBackend;
use eddy_solver::Simulation;
use eddy_types::EddyResult;

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run a single scenario on `backend`.
    pub fn run<B: GpuBackend>(scenario: &Scenario, backend: B) -> EddyResult<BenchmarkMetrics> {
        Self::run_with_hooks(scenario, backend, &mut [])
    }

    /// Run a single scenario, feeding every step through `hooks`.
    pub fn run_with_hooks<B: GpuBackend>(
        scenario: &Scenario,
        backend: B,
        hooks: &mut [&mut dyn InspectionHook],
    ) -> EddyResult<BenchmarkMetrics> {
        let mut sim = Simulation::new(backend, scenario.config.clone())?;
        scenario.initialize(sim.state_mut())?;

        let backend_name = sim.solver().backend().name().to_string();
        let grid = sim.state().grid();
        let initial_mass = sim.state().total_density();

        tracing::info!(
            scenario = scenario.kind.name(),
            backend = %backend_name,
            n = grid.n(),
            timesteps = scenario.timesteps,
            "benchmark start"
        );

        let mut step_times: Vec<f64> = Vec::with_capacity(scenario.timesteps as usize);
        let mut total_sweeps: u64 = 0;
        let mut max_divergence = 0.0f32;

        let total_start = Instant::now();

        for step in 0..scenario.timesteps {
            let timestep = sim.timestep();
            for hook in hooks.iter_mut() {
                hook.on_timestep_begin(timestep, sim.time());
            }

            scenario.inject(sim.state_mut(), step)?;
            let report = sim.step()?;

            step_times.push(report.wall_time);
            total_sweeps += report.sweeps as u64;
            max_divergence = max_divergence.max(report.max_divergence);

            for hook in hooks.iter_mut() {
                hook.on_step_report(timestep, &report);
                hook.on_timestep_end(timestep, report.wall_time);
            }
        }
        for hook in hooks.iter_mut() {
            hook.on_simulation_end();
        }

        let total_wall_time = total_start.elapsed().as_secs_f64();

        let avg_step = if step_times.is_empty() {
            0.0
        } else {
            step_times.iter().sum::<f64>() / step_times.len() as f64
        };
        let min_step = step_times.iter().copied().fold(f64::MAX, f64::min);
        let max_step = step_times.iter().copied().fold(0.0, f64::max);
        let sweep_time: f64 = step_times.iter().sum();
        let cell_updates = total_sweeps as f64 * (grid.n() * grid.n()) as f64;
        let cell_updates_per_second = if sweep_time > 0.0 {
            cell_updates / sweep_time
        } else {
            0.0
        };

        Ok(BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            backend: backend_name,
            resolution: grid.n() as u32,
            timesteps: scenario.timesteps,
            total_wall_time,
            avg_step_time: avg_step,
            min_step_time: if step_times.is_empty() { 0.0 } else { min_step },
            max_step_time: max_step,
            total_sweeps,
            cell_updates_per_second,
            max_divergence,
            initial_mass,
            final_mass: sim.state().total_density(),
            final_kinetic_energy: sim.state().kinetic_energy(),
        })
    }

    /// Run all scenarios, building a fresh backend for each.
    pub fn run_all<B, F>(mut make_backend: F) -> EddyResult<Vec<BenchmarkMetrics>>
    where
        B: GpuBackend,
        F: FnMut() -> B,
    {
        let mut results = Vec::new();
        for &kind in ScenarioKind::all() {
            let scenario = Scenario::from_kind(kind);
            results.push(Self::run(&scenario, make_backend())?);
        }
        Ok(results)
    }
}
