/*!
 * CPU Scheduler
 * Cooperative priority round-robin over a fixed processor pool
 */

use crate::core::limits::PREALLOCATED_PRIORITY_LEVELS;
use crate::monitoring::{EventCollector, SchedulerEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

mod atomic_stats;
mod config;
mod operations;
mod queue;
mod state;
mod stats;
mod traits;
mod types;
mod wait;

use atomic_stats::AtomicSchedulerStats;
use state::SchedulerState;

// Re-export public API
pub use config::SchedulerConfig;
pub use traits::{ProcessRegistry, ProcessScheduler, SchedulerControl};
pub use types::{
    PriorityOrder, ProcessState, SchedulerSnapshot, SchedulerStats, YieldPolicy,
};

/// CPU Scheduler
///
/// All caller threads share one state aggregate behind a single mutex.
/// There is no scheduler thread: every operation runs on the caller, and a
/// caller that has to wait parks on its own process's condition until some
/// other caller's `schedule`/`terminate` hands it a processor.
///
/// Cloning is cheap and every clone drives the same scheduler.
pub struct Scheduler {
    state: Arc<Mutex<SchedulerState>>,

    // Statistics - lock-free atomics so readers never take the state lock
    stats: Arc<AtomicSchedulerStats>,

    // Structured event stream
    collector: Option<Arc<EventCollector>>,
}

impl Scheduler {
    /// Single-processor scheduler with default policies
    pub fn new() -> Self {
        Self::build(SchedulerConfig::default())
    }

    /// Create scheduler from a validated configuration
    pub fn with_config(config: SchedulerConfig) -> crate::SchedulerResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SchedulerConfig) -> Self {
        info!(
            processors = config.processors,
            priority_order = config.priority_order.as_str(),
            yield_policy = config.yield_policy.as_str(),
            preallocated_levels = PREALLOCATED_PRIORITY_LEVELS,
            "scheduler initialized"
        );

        Self {
            state: Arc::new(Mutex::new(SchedulerState::new(
                config.processors,
                config.priority_order,
                config.yield_policy,
            ))),
            stats: Arc::new(AtomicSchedulerStats::new()),
            collector: None,
        }
    }

    /// Add event collector
    pub fn with_collector(mut self, collector: Arc<EventCollector>) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Called with the state lock held so event order matches transition order
    #[inline]
    fn emit(&self, event: SchedulerEvent) {
        if let Some(collector) = &self.collector {
            collector.emit(event);
        }
    }
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            stats: Arc::clone(&self.stats),
            collector: self.collector.as_ref().map(Arc::clone),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchedulerError;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_register_sequential_ids() {
        let scheduler = Scheduler::new();
        for expected in 0..4 {
            assert_eq!(scheduler.register(1), Ok(expected));
        }
        assert_eq!(scheduler.stats().registered, 4);
    }

    #[test]
    fn test_start_takes_free_processor() {
        let scheduler = Scheduler::new();
        let pid = scheduler.register(1).unwrap();

        assert_eq!(scheduler.start(pid).unwrap(), 0);
        assert_eq!(scheduler.state(pid).unwrap(), ProcessState::Running);
        assert_eq!(scheduler.assigned_processor(pid).unwrap(), Some(0));
    }

    #[test]
    fn test_schedule_without_waiters_keeps_running() {
        let scheduler = Scheduler::new();
        let pid = scheduler.register(1).unwrap();
        scheduler.start(pid).unwrap();

        assert_eq!(scheduler.schedule(pid).unwrap(), 0);
        assert_eq!(scheduler.schedule(pid).unwrap(), 0);
        scheduler.terminate(pid).unwrap();
        assert_eq!(scheduler.state(pid).unwrap(), ProcessState::Terminated);
        assert_eq!(scheduler.running_count(), 0);
    }

    #[test]
    fn test_misuse_is_reported() {
        let scheduler = Scheduler::new();
        let pid = scheduler.register(1).unwrap();

        assert!(matches!(
            scheduler.schedule(pid),
            Err(SchedulerError::NotRunning { .. })
        ));
        assert!(matches!(
            scheduler.terminate(pid),
            Err(SchedulerError::NotRunning { .. })
        ));
        scheduler.start(pid).unwrap();
        assert!(matches!(
            scheduler.start(pid),
            Err(SchedulerError::AlreadyActive { .. })
        ));
        assert_eq!(scheduler.start(99), Err(SchedulerError::ProcessNotFound(99)));
    }

    #[test]
    fn test_configure_processors() {
        let scheduler = Scheduler::new();
        assert_eq!(
            scheduler.configure_processors(0),
            Err(SchedulerError::InvalidProcessorCount(0))
        );
        scheduler.configure_processors(3).unwrap();
        assert_eq!(scheduler.processor_count(), 3);

        let pid = scheduler.register(1).unwrap();
        scheduler.start(pid).unwrap();
        assert!(matches!(
            scheduler.configure_processors(2),
            Err(SchedulerError::ProcessorsBusy { running: 1, .. })
        ));
    }

    #[test]
    fn test_blocked_start_resumes_on_terminate() {
        let scheduler = Scheduler::new();
        let holder = scheduler.register(1).unwrap();
        let waiter = scheduler.register(1).unwrap();
        scheduler.start(holder).unwrap();

        let s = scheduler.clone();
        let handle = thread::spawn(move || s.start(waiter));

        while scheduler.waiting_count() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(scheduler.state(waiter).unwrap(), ProcessState::Ready);

        scheduler.terminate(holder).unwrap();
        assert_eq!(handle.join().unwrap(), Ok(0));
        assert_eq!(scheduler.state(waiter).unwrap(), ProcessState::Running);
        assert_eq!(scheduler.stats().dispatches, 1);
    }

    #[test]
    fn test_assignment_at_deadline_beats_timeout() {
        let scheduler = Scheduler::new();
        let yielder = scheduler.register(1).unwrap();
        let holder = scheduler.register(1).unwrap();
        scheduler.start(yielder).unwrap();

        let s = scheduler.clone();
        let holder_handle = thread::spawn(move || s.start(holder));
        while scheduler.waiting_count() == 0 {
            thread::sleep(Duration::from_millis(1));
        }

        let s = scheduler.clone();
        let yield_handle =
            thread::spawn(move || s.schedule_timeout(yielder, Duration::from_millis(30)));
        assert_eq!(holder_handle.join().unwrap(), Ok(0));
        while scheduler.state(yielder).unwrap() != ProcessState::Ready {
            thread::sleep(Duration::from_millis(1));
        }

        // Let the deadline pass while the lock is held, then hand over the processor
        {
            let mut state = scheduler.state.lock();
            thread::sleep(Duration::from_millis(80));
            let cpu = state.release(holder).unwrap();
            state.record_mut(holder).unwrap().state = ProcessState::Terminated;
            assert_eq!(state.dispatch(cpu).unwrap(), Some((yielder, 1)));
        }

        assert_eq!(yield_handle.join().unwrap(), Ok(0));
        assert_eq!(scheduler.state(yielder).unwrap(), ProcessState::Running);
        assert_eq!(scheduler.stats().timeouts, 0);
        assert_eq!(scheduler.waiting_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let scheduler = Scheduler::new();
        let other = scheduler.clone();
        let pid = other.register(2).unwrap();
        assert_eq!(scheduler.priority(pid).unwrap(), 2);
    }
}
