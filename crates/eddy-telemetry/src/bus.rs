//! Per-timestep event dispatch.
//!
//! Drivers queue a step's events with [`EventBus::emit`] or
//! [`EventBus::extend`] and deliver the batch with [`EventBus::flush`]
//! once the step is done, so sinks never observe a half-finished step.
//! [`EventBus::close`] ends the run: it delivers the tail, finalizes every
//! sink exactly once, and drops anything emitted afterwards.

use crate::events::SimulationEvent;
use crate::sinks::EventSink;

/// Batches simulation events and fans them out to sinks.
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
    pending: Vec<SimulationEvent>,
    /// Kind names (see [`SimulationEvent::kind_name`]) dropped at emit time.
    muted: Vec<&'static str>,
    delivered: u64,
    closed: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            pending: Vec::new(),
            muted: Vec::new(),
            delivered: 0,
            closed: false,
        }
    }

    /// Registers a sink. Sinks receive events in registration order.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Drops every future event whose kind name is `kind`.
    pub fn mute(&mut self, kind: &'static str) {
        if !self.muted.contains(&kind) {
            self.muted.push(kind);
        }
    }

    /// Queues one event for the next flush.
    pub fn emit(&mut self, event: SimulationEvent) {
        if self.closed || self.muted.contains(&event.kind_name()) {
            return;
        }
        self.pending.push(event);
    }

    /// Queues a batch, typically a hook's drained events for one step.
    pub fn extend<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = SimulationEvent>,
    {
        for event in events {
            self.emit(event);
        }
    }

    /// Delivers every queued event to every sink, in emission order.
    /// Returns the number of events delivered.
    pub fn flush(&mut self) -> usize {
        let batch = std::mem::take(&mut self.pending);
        for event in &batch {
            for sink in &mut self.sinks {
                sink.handle(event);
            }
        }
        self.delivered += batch.len() as u64;
        batch.len()
    }

    /// Flushes the tail and finalizes the sinks. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Events queued but not yet flushed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Events delivered over the bus's lifetime.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
