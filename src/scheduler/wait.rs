/*!
 * Processor Wait
 * Park a queued process on its own condition until it is assigned a processor
 */

use super::state::SchedulerState;
use super::Scheduler;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::limits::SLOW_WAIT_THRESHOLD;
use crate::core::types::{Pid, ProcessorId};
use crate::monitoring::SchedulerEvent;
use parking_lot::MutexGuard;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

impl Scheduler {
    /// Wait until `pid` owns a processor, it is cancelled, or `deadline` passes
    ///
    /// The lock is released while parked. Every wakeup re-checks the
    /// assignment, so spurious wakeups and signals meant for a previous wait
    /// are harmless. An assignment that lands before the deadline is
    /// observed wins over the timeout.
    pub(super) fn await_assignment(
        &self,
        state: &mut MutexGuard<'_, SchedulerState>,
        pid: Pid,
        deadline: Option<Instant>,
    ) -> SchedulerResult<ProcessorId> {
        let wakeup = Arc::clone(&state.record(pid)?.wakeup);
        let parked_at = Instant::now();
        let mut timed_out = false;

        loop {
            let record = state.record_mut(pid)?;

            if let Some(cpu) = record.assigned {
                let waited = parked_at.elapsed();
                if waited >= SLOW_WAIT_THRESHOLD {
                    warn!(pid, processor = cpu, waited_ms = waited.as_millis() as u64, slow = true, "long wait for processor");
                } else {
                    debug!(pid, processor = cpu, waited_us = waited.as_micros() as u64, "woke with processor");
                }
                return Ok(cpu);
            }

            if record.cancel_pending {
                // cancel() already withdrew us from the ready queue
                record.cancel_pending = false;
                return Err(SchedulerError::Cancelled(pid));
            }

            if timed_out {
                state.withdraw(pid)?;
                let waited_ms = parked_at.elapsed().as_millis() as u64;
                self.stats.inc_timeouts();
                self.emit(SchedulerEvent::TimedOut { pid });
                info!(pid, waited_ms, "gave up waiting for processor");
                return Err(SchedulerError::Timeout { pid, waited_ms });
            }

            match deadline {
                Some(deadline) => timed_out = wakeup.wait_until(state, deadline).timed_out(),
                None => wakeup.wait(state),
            }
        }
    }
}
