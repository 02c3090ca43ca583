//! Pluggable event sinks.
//!
//! Sinks consume events from the bus and process them
//! (collect in memory, log through `tracing`, write JSON lines).

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::events::SimulationEvent;

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events in a shared `Vec` for testing and inspection.
///
/// Clones share the same storage, so a clone kept by the caller sees
/// everything the boxed sink receives.
#[derive(Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything collected so far.
    pub fn events(&self) -> Vec<SimulationEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of events collected so far.
    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that logs events using the `tracing` crate.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        let kind = event.kind_name();
        if self.level == tracing::Level::TRACE {
            tracing::trace!(timestep = event.timestep, kind, event = ?event.kind, "simulation_event");
        } else if self.level == tracing::Level::DEBUG {
            tracing::debug!(timestep = event.timestep, kind, event = ?event.kind, "simulation_event");
        } else {
            tracing::info!(timestep = event.timestep, kind, event = ?event.kind, "simulation_event");
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}

/// Writes one JSON object per event to `W`.
///
/// Write failures are logged and the event is dropped; telemetry never
/// aborts a run.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn handle(&mut self, event: &SimulationEvent) {
        let result = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(e) = result {
            tracing::warn!(error = %e, "dropping telemetry event");
        }
    }

    fn finalize(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(error = %e, "failed to flush telemetry writer");
        }
    }

    fn name(&self) -> &str {
        "json_lines_sink"
    }
}
