//! Benchmark metrics — data collected during a benchmark run.

use serde::{Deserialize, Serialize};

use eddy_types::{EddyError, EddyResult};

/// Metrics collected from a benchmark scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Backend that executed the sweeps.
    pub backend: String,
    /// Interior resolution N.
    pub resolution: u32,
    /// Number of timesteps executed.
    pub timesteps: u32,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Average wall-clock time per timestep (seconds).
    pub avg_step_time: f64,
    /// Minimum step time.
    pub min_step_time: f64,
    /// Maximum step time.
    pub max_step_time: f64,
    /// Relaxation sweeps across the whole run.
    pub total_sweeps: u64,
    /// Interior cell updates per second over all sweeps.
    pub cell_updates_per_second: f64,
    /// Largest post-step divergence seen.
    pub max_divergence: f32,
    /// Total density before the first step.
    pub initial_mass: f64,
    /// Total density after the last step.
    pub final_mass: f64,
    /// Kinetic energy after the last step.
    pub final_kinetic_energy: f64,
}

impl BenchmarkMetrics {
    /// `|final - initial| / initial`, or 0 when nothing was there to lose.
    pub fn relative_mass_drift(&self) -> f64 {
        if self.initial_mass.abs() < f64::EPSILON {
            0.0
        } else {
            ((self.final_mass - self.initial_mass) / self.initial_mass).abs()
        }
    }

    /// CSV header row.
    pub fn to_csv_header() -> String {
        "scenario,backend,resolution,timesteps,total_wall_time_s,avg_step_ms,min_step_ms,max_step_ms,total_sweeps,cell_updates_per_s,max_divergence,initial_mass,final_mass,final_ke".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{:.6},{:.4},{:.4},{:.4},{},{:.3e},{:.6e},{:.6},{:.6},{:.6e}",
            self.scenario,
            self.backend,
            self.resolution,
            self.timesteps,
            self.total_wall_time,
            self.avg_step_time * 1000.0,
            self.min_step_time * 1000.0,
            self.max_step_time * 1000.0,
            self.total_sweeps,
            self.cell_updates_per_second,
            self.max_divergence,
            self.initial_mass,
            self.final_mass,
            self.final_kinetic_energy,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }

    /// Format multiple metrics as a pretty-printed JSON array.
    pub fn to_json(metrics: &[BenchmarkMetrics]) -> EddyResult<String> {
        serde_json::to_string_pretty(metrics)
            .map_err(|e| EddyError::Serialization(format!("Metrics serialization failed: {e}")))
    }
}
