//! Simulation event types.
//!
//! Structured events emitted once per timestep by the drivers. Events are
//! lightweight value types that carry just enough data to monitor a run.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the engine.
///
/// Events are tagged with a timestep index and carry domain-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Timestep number (0-indexed).
    pub timestep: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Backend chosen for the run.
    BackendSelected {
        /// Backend name (e.g. "parallel").
        name: String,
        /// Whether sweeps execute on a GPU.
        gpu: bool,
    },

    /// Timestep started.
    TimestepBegin {
        /// Simulated time at the start of the step (seconds).
        sim_time: f64,
    },

    /// Timestep completed.
    TimestepEnd {
        /// Wall-clock time for the entire timestep (seconds).
        wall_time: f64,
    },

    /// Relaxation work done during the step.
    Relaxation {
        /// Jacobi sweeps executed across every solve in the step.
        sweeps: u32,
    },

    /// Incompressibility check after the step.
    Divergence {
        /// Largest central-difference divergence over the interior.
        max_abs: f32,
    },

    /// Total density `Σ ρ·h²` after the step.
    Mass {
        total: f64,
    },

    /// Kinetic energy `0.5·Σ(u² + v²)·h²` after the step.
    Energy {
        kinetic: f64,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given timestep.
    pub fn new(timestep: u64, kind: EventKind) -> Self {
        Self { timestep, kind }
    }

    /// Short snake_case name of the payload variant.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            EventKind::BackendSelected { .. } => "backend_selected",
            EventKind::TimestepBegin { .. } => "timestep_begin",
            EventKind::TimestepEnd { .. } => "timestep_end",
            EventKind::Relaxation { .. } => "relaxation",
            EventKind::Divergence { .. } => "divergence",
            EventKind::Mass { .. } => "mass",
            EventKind::Energy { .. } => "energy",
            EventKind::Custom { .. } => "custom",
        }
    }
}
