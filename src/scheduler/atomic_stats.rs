/*!
 * Lock-Free Scheduler Statistics
 * Atomic counters so reading stats never contends with the scheduler lock
 */

use super::types::SchedulerStats;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic scheduler statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - All operations use relaxed ordering; counters are monotonic and independent
#[repr(C, align(64))]
#[derive(Default)]
pub struct AtomicSchedulerStats {
    registered: AtomicU64,
    immediate_assignments: AtomicU64,
    dispatches: AtomicU64,
    enqueued: AtomicU64,
    yields: AtomicU64,
    terminations: AtomicU64,
    cancellations: AtomicU64,
    timeouts: AtomicU64,
}

macro_rules! counter {
    ($name:ident, $field:ident) => {
        #[inline(always)]
        pub fn $name(&self) {
            self.$field.fetch_add(1, Ordering::Relaxed);
        }
    };
}

impl AtomicSchedulerStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    counter!(inc_registered, registered);
    counter!(inc_immediate, immediate_assignments);
    counter!(inc_dispatches, dispatches);
    counter!(inc_enqueued, enqueued);
    counter!(inc_yields, yields);
    counter!(inc_terminations, terminations);
    counter!(inc_cancellations, cancellations);
    counter!(inc_timeouts, timeouts);

    /// Get snapshot of current stats
    ///
    /// # Note
    /// Counter values may not be perfectly consistent with each other due to concurrent updates,
    /// but each individual value is accurate. This is acceptable for monitoring.
    #[inline]
    pub fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            registered: self.registered.load(Ordering::Relaxed),
            immediate_assignments: self.immediate_assignments.load(Ordering::Relaxed),
            dispatches: self.dispatches.load(Ordering::Relaxed),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            yields: self.yields.load(Ordering::Relaxed),
            terminations: self.terminations.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
        }
    }
}
