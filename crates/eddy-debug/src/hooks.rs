//! Inspection hooks for live debugging.
//!
//! Hooks are called by the drivers at fixed points of every timestep to
//! capture metrics without touching the solver itself.

use eddy_solver::StepReport;
use eddy_telemetry::events::{EventKind, SimulationEvent};

/// Trait for simulation inspection hooks.
///
/// # Lifecycle
///
/// ```text
/// for each timestep:
///   hook.on_timestep_begin(...)
///   hook.on_step_report(...)
///   hook.on_timestep_end(...)
/// hook.on_simulation_end()
/// ```
pub trait InspectionHook: Send {
    /// Called at the beginning of each timestep.
    fn on_timestep_begin(&mut self, timestep: u64, sim_time: f64) {
        let _ = (timestep, sim_time);
    }

    /// Called with the solver's report once the step has completed.
    fn on_step_report(&mut self, timestep: u64, report: &StepReport) {
        let _ = (timestep, report);
    }

    /// Called at the end of each timestep.
    fn on_timestep_end(&mut self, timestep: u64, wall_time: f64) {
        let _ = (timestep, wall_time);
    }

    /// Called when the simulation completes.
    fn on_simulation_end(&mut self) {}

    /// Returns the hook's name for logging.
    fn name(&self) -> &str;
}

/// Hook that bridges to the telemetry event bus.
///
/// Translates lifecycle calls into telemetry events; drain them and emit
/// them on an [`EventBus`](eddy_telemetry::EventBus).
pub struct TelemetryHook {
    events: Vec<SimulationEvent>,
}

impl TelemetryHook {
    /// Creates a new telemetry hook.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Drains collected events for dispatch.
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for TelemetryHook {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectionHook for TelemetryHook {
    fn on_timestep_begin(&mut self, timestep: u64, sim_time: f64) {
        self.events.push(SimulationEvent::new(
            timestep,
            EventKind::TimestepBegin { sim_time },
        ));
    }

    fn on_step_report(&mut self, timestep: u64, report: &StepReport) {
        let kinds = [
            EventKind::Relaxation {
                sweeps: report.sweeps,
            },
            EventKind::Divergence {
                max_abs: report.max_divergence,
            },
            EventKind::Mass {
                total: report.total_density,
            },
            EventKind::Energy {
                kinetic: report.kinetic_energy,
            },
        ];
        self.events
            .extend(kinds.into_iter().map(|kind| SimulationEvent::new(timestep, kind)));
    }

    fn on_timestep_end(&mut self, timestep: u64, wall_time: f64) {
        self.events.push(SimulationEvent::new(
            timestep,
            EventKind::TimestepEnd { wall_time },
        ));
    }

    fn name(&self) -> &str {
        "telemetry_hook"
    }
}

/// Tracks the worst post-step divergence and warns when it exceeds a limit.
pub struct DivergenceWatch {
    limit: f32,
    worst: f32,
    worst_step: Option<u64>,
    violations: u32,
}

impl DivergenceWatch {
    pub fn new(limit: f32) -> Self {
        Self {
            limit,
            worst: 0.0,
            worst_step: None,
            violations: 0,
        }
    }

    /// Largest divergence seen and the step it occurred at.
    pub fn worst(&self) -> Option<(u64, f32)> {
        self.worst_step.map(|step| (step, self.worst))
    }

    /// Steps whose divergence exceeded the limit.
    pub fn violations(&self) -> u32 {
        self.violations
    }
}

impl InspectionHook for DivergenceWatch {
    fn on_step_report(&mut self, timestep: u64, report: &StepReport) {
        let div = report.max_divergence;
        if self.worst_step.is_none() || div > self.worst {
            self.worst = div;
            self.worst_step = Some(timestep);
        }
        if div > self.limit {
            self.violations += 1;
            tracing::warn!(timestep, max_divergence = div, limit = self.limit, "divergence above limit");
        }
    }

    fn on_simulation_end(&mut self) {
        if let Some((step, worst)) = self.worst() {
            tracing::info!(step, worst, violations = self.violations, "divergence summary");
        }
    }

    fn name(&self) -> &str {
        "divergence_watch"
    }
}
