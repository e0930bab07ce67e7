/*!
 * Scheduler Introspection
 * Read-only views of process state, the processor pool and statistics
 */

use super::types::{ProcessState, SchedulerSnapshot, SchedulerStats};
use super::Scheduler;
use crate::core::errors::SchedulerResult;
use crate::core::types::{Pid, Priority, ProcessorId};

impl Scheduler {
    /// Get scheduler statistics (lock-free snapshot)
    pub fn stats(&self) -> SchedulerStats {
        self.stats.snapshot()
    }

    pub fn state(&self, pid: Pid) -> SchedulerResult<ProcessState> {
        Ok(self.state.lock().record(pid)?.state)
    }

    pub fn assigned_processor(&self, pid: Pid) -> SchedulerResult<Option<ProcessorId>> {
        Ok(self.state.lock().record(pid)?.assigned)
    }

    pub fn priority(&self, pid: Pid) -> SchedulerResult<Priority> {
        Ok(self.state.lock().record(pid)?.priority)
    }

    pub fn processor_count(&self) -> usize {
        self.state.lock().processor_count()
    }

    /// Processes currently holding a processor
    pub fn running_count(&self) -> usize {
        self.state.lock().running_count()
    }

    /// Processes parked in a ready queue
    pub fn waiting_count(&self) -> usize {
        self.state.lock().waiting_count()
    }

    /// No process running or waiting
    pub fn is_idle(&self) -> bool {
        self.state.lock().is_idle()
    }

    /// Consistent view of slots and queues taken under the lock
    pub fn snapshot(&self) -> SchedulerSnapshot {
        self.state.lock().snapshot()
    }
}
