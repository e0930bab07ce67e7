/*!
 * Cooperative Scheduler Library
 * Priority round-robin over a fixed processor pool, driven by caller threads
 */

pub mod core;
pub mod monitoring;
pub mod scheduler;

// Re-exports
pub use crate::core::errors::{SchedulerError, SchedulerResult};
pub use crate::core::types::{Pid, Priority, ProcessorId};
pub use monitoring::{init_tracing, EventCollector, SchedulerEvent};
pub use scheduler::{
    PriorityOrder, ProcessRegistry, ProcessScheduler, ProcessState, Scheduler, SchedulerConfig,
    SchedulerControl, SchedulerSnapshot, SchedulerStats, YieldPolicy,
};
