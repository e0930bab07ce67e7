/*!
 * Scheduler Events
 * Structured event stream for observing state transitions in order
 */

use crate::core::types::{Pid, Priority, ProcessorId};
use flume::{Receiver, Sender};
use serde::Serialize;

/// One scheduler state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedulerEvent {
    ProcessorsConfigured { count: usize },
    Registered { pid: Pid, priority: Priority },
    /// Took a free processor without waiting
    Allocated { pid: Pid, processor: ProcessorId },
    Enqueued { pid: Pid, priority: Priority },
    /// A parked waiter was handed a freed processor
    Dispatched { pid: Pid, processor: ProcessorId, priority: Priority },
    Released { pid: Pid, processor: ProcessorId },
    /// A yielding process kept its processor
    Retained { pid: Pid, processor: ProcessorId },
    Terminated { pid: Pid },
    Cancelled { pid: Pid },
    TimedOut { pid: Pid },
}

impl SchedulerEvent {
    /// Process the event is about, if any
    pub fn pid(&self) -> Option<Pid> {
        match *self {
            Self::ProcessorsConfigured { .. } => None,
            Self::Registered { pid, .. }
            | Self::Allocated { pid, .. }
            | Self::Enqueued { pid, .. }
            | Self::Dispatched { pid, .. }
            | Self::Released { pid, .. }
            | Self::Retained { pid, .. }
            | Self::Terminated { pid }
            | Self::Cancelled { pid }
            | Self::TimedOut { pid } => Some(pid),
        }
    }
}

/// Event sink backed by an unbounded channel
///
/// Emission never blocks, so it is safe to call under the scheduler lock.
pub struct EventCollector {
    tx: Sender<SchedulerEvent>,
    rx: Receiver<SchedulerEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    #[inline]
    pub fn emit(&self, event: SchedulerEvent) {
        // The collector owns a receiver, so the channel cannot be disconnected
        let _ = self.tx.send(event);
    }

    /// Receiver sharing this collector's queue (each event goes to one receiver)
    pub fn subscribe(&self) -> Receiver<SchedulerEvent> {
        self.rx.clone()
    }

    /// Take everything emitted so far
    pub fn drain(&self) -> Vec<SchedulerEvent> {
        self.rx.try_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for EventCollector {
    fn default() -> Self {
        Self::new()
    }
}
