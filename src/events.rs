//! Run lifecycle events.
//!
//! The orchestrator emits via [`EventBus::emit`] and observers subscribe via
//! [`EventBus::subscribe`]. Built on [`tokio::sync::broadcast`] so several
//! listeners can follow runs independently. Events carry a run id so
//! concurrent runs can be told apart.

use tokio::sync::broadcast;

use crate::engine::RunState;
use crate::function::FunctionHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RunStarted { run: u64, steps: usize },
    StepStarted { run: u64, index: usize, function: FunctionHandle },
    /// `failed` is true when this step ended the run with an error.
    StepFinished { run: u64, index: usize, function: FunctionHandle, failed: bool },
    RunFinished { run: u64, state: RunState },
}

impl Event {
    pub fn run(&self) -> u64 {
        match self {
            Event::RunStarted { run, .. }
            | Event::StepStarted { run, .. }
            | Event::StepFinished { run, .. }
            | Event::RunFinished { run, .. } => *run,
        }
    }
}

#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers.
    /// Returns the number of receivers that will see it.
    pub fn emit(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to future events (past ones are not replayed).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
