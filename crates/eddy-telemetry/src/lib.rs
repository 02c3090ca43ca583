//! # eddy-telemetry
//!
//! Event bus for simulation telemetry. Emits structured events
//! (timing, relaxation work, divergence, mass, energy) that are consumed
//! by pluggable sinks (in-memory, `tracing`, JSON lines).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, JsonLinesSink, TracingSink, VecSink};
