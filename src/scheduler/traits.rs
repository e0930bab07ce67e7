/*!
 * Scheduler Traits
 * Interface definitions the process harness drives
 */

use crate::core::errors::SchedulerResult;
use crate::core::types::{Pid, Priority, ProcessorId};

/// Pool setup and process registration
pub trait ProcessRegistry: Send + Sync {
    /// Resize the processor pool to `count` free slots
    fn configure_processors(&self, count: usize) -> SchedulerResult<()>;

    /// Register a process and return its id
    fn register(&self, priority: Priority) -> SchedulerResult<Pid>;
}

/// Voluntary lifecycle transitions issued by a running process
pub trait SchedulerControl: Send + Sync {
    /// Block until `pid` owns a processor
    fn start(&self, pid: Pid) -> SchedulerResult<ProcessorId>;

    /// Yield the processor and block until re-assigned one
    fn schedule(&self, pid: Pid) -> SchedulerResult<ProcessorId>;

    /// Release the processor for good
    fn terminate(&self, pid: Pid) -> SchedulerResult<()>;
}

/// Combined interface
pub trait ProcessScheduler: ProcessRegistry + SchedulerControl {}

// Blanket implementation for any type that implements both component traits
impl<T> ProcessScheduler for T where T: ProcessRegistry + SchedulerControl {}
