/*!
 * Scheduler State
 * Processor pool, ready queues and process records guarded by one lock
 */

use super::queue::ReadyQueues;
use super::types::{PriorityOrder, ProcessState, SchedulerSnapshot, YieldPolicy};
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::limits::PREALLOCATED_PRIORITY_LEVELS;
use crate::core::types::{Pid, Priority, ProcessorId};
use parking_lot::Condvar;
use std::sync::Arc;

/// Per-process bookkeeping
#[derive(Debug)]
pub(super) struct ProcessRecord {
    pub priority: Priority,
    pub assigned: Option<ProcessorId>,
    pub state: ProcessState,
    /// Parks exactly this process; only ever signalled for it
    pub wakeup: Arc<Condvar>,
    /// Set by cancel() for a parked waiter that has not observed it yet
    pub cancel_pending: bool,
}

impl ProcessRecord {
    fn new(priority: Priority) -> Self {
        Self {
            priority,
            assigned: None,
            state: ProcessState::Unstarted,
            wakeup: Arc::new(Condvar::new()),
            cancel_pending: false,
        }
    }

    #[inline]
    pub fn startable(&self) -> bool {
        self.state.can_start() && !self.cancel_pending
    }
}

/// Outcome of admitting a process that wants a processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Admission {
    Assigned(ProcessorId),
    Queued(Priority),
}

/// Everything the scheduler mutates, always behind the same mutex
#[derive(Debug)]
pub(super) struct SchedulerState {
    processors: Vec<Option<Pid>>,
    ready: ReadyQueues,
    processes: Vec<ProcessRecord>,
    pub order: PriorityOrder,
    pub yield_policy: YieldPolicy,
}

impl SchedulerState {
    pub fn new(processors: usize, order: PriorityOrder, yield_policy: YieldPolicy) -> Self {
        Self {
            processors: vec![None; processors],
            ready: ReadyQueues::new(PREALLOCATED_PRIORITY_LEVELS),
            processes: Vec::new(),
            order,
            yield_policy,
        }
    }

    pub fn record(&self, pid: Pid) -> SchedulerResult<&ProcessRecord> {
        self.processes
            .get(pid as usize)
            .ok_or(SchedulerError::ProcessNotFound(pid))
    }

    pub fn record_mut(&mut self, pid: Pid) -> SchedulerResult<&mut ProcessRecord> {
        self.processes
            .get_mut(pid as usize)
            .ok_or(SchedulerError::ProcessNotFound(pid))
    }

    /// Replace the pool with `n` free slots
    pub fn resize(&mut self, n: usize) -> SchedulerResult<()> {
        let running = self.running_count();
        let waiting = self.ready.len();
        if running > 0 || waiting > 0 {
            return Err(SchedulerError::ProcessorsBusy { running, waiting });
        }
        self.processors = vec![None; n];
        Ok(())
    }

    pub fn register(&mut self, priority: Priority) -> SchedulerResult<Pid> {
        let pid = next_pid(self.processes.len())?;
        self.processes.push(ProcessRecord::new(priority));
        Ok(pid)
    }

    #[inline]
    fn free_slot(&self) -> Option<ProcessorId> {
        self.processors.iter().position(Option::is_none)
    }

    /// Refuse to hand out an occupied `cpu` or to give `pid` a second one
    fn check_assignable(&self, pid: Pid, cpu: ProcessorId) -> SchedulerResult<()> {
        if let Some(owner) = self.processors[cpu] {
            return Err(SchedulerError::DoubleAssignment {
                pid: owner,
                processor: cpu,
            });
        }
        if let Some(processor) = self.record(pid)?.assigned {
            return Err(SchedulerError::DoubleAssignment { pid, processor });
        }
        Ok(())
    }

    /// Give `cpu` to `pid` and mark it running
    fn assign(&mut self, pid: Pid, cpu: ProcessorId) -> SchedulerResult<()> {
        self.check_assignable(pid, cpu)?;
        let record = self.record_mut(pid)?;
        record.assigned = Some(cpu);
        record.state = ProcessState::Running;
        self.processors[cpu] = Some(pid);
        Ok(())
    }

    /// Free the processor held by `pid`
    pub fn release(&mut self, pid: Pid) -> SchedulerResult<ProcessorId> {
        let record = self.record_mut(pid)?;
        let cpu = match (record.state, record.assigned) {
            (ProcessState::Running, Some(cpu)) => cpu,
            (state, _) => return Err(SchedulerError::NotRunning { pid, state }),
        };
        record.assigned = None;
        record.state = ProcessState::Unstarted;
        self.processors[cpu] = None;
        Ok(cpu)
    }

    /// Take a free processor if there is one, otherwise join the ready queue
    pub fn admit(&mut self, pid: Pid) -> SchedulerResult<Admission> {
        if let Some(cpu) = self.free_slot() {
            self.assign(pid, cpu)?;
            return Ok(Admission::Assigned(cpu));
        }
        let record = self.record_mut(pid)?;
        record.state = ProcessState::Ready;
        let priority = record.priority;
        self.ready.push(priority, pid);
        Ok(Admission::Queued(priority))
    }

    /// Hand the freed `cpu` to the most urgent waiter and signal only that waiter
    ///
    /// The waiter stays queued if the assignment is refused.
    pub fn dispatch(&mut self, cpu: ProcessorId) -> SchedulerResult<Option<(Pid, Priority)>> {
        let Some((priority, pid)) = self.ready.peek(self.order) else {
            return Ok(None);
        };
        self.check_assignable(pid, cpu)?;
        self.ready.pop(self.order);
        self.assign(pid, cpu)?;
        self.record(pid)?.wakeup.notify_one();
        Ok(Some((pid, priority)))
    }

    /// Pull a parked process back out of its ready queue
    pub fn withdraw(&mut self, pid: Pid) -> SchedulerResult<bool> {
        let record = self.record_mut(pid)?;
        if !record.state.is_waiting() {
            return Ok(false);
        }
        record.state = ProcessState::Unstarted;
        let priority = record.priority;
        Ok(self.ready.remove(priority, pid))
    }

    /// Whether a yielding `pid` beats every parked waiter
    pub fn outranks_waiters(&self, pid: Pid) -> SchedulerResult<bool> {
        let priority = self.record(pid)?.priority;
        Ok(match self.ready.most_urgent(self.order) {
            Some(best) => self.order.more_urgent(priority, best),
            None => true,
        })
    }

    #[inline]
    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    pub fn running_count(&self) -> usize {
        self.processors.iter().filter(|slot| slot.is_some()).count()
    }

    #[inline]
    pub fn waiting_count(&self) -> usize {
        self.ready.len()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.ready.is_empty() && self.running_count() == 0
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            processors: self.processors.clone(),
            ready: self.ready.snapshot(self.order),
        }
    }
}

/// Id for the `len`-th registration; `Pid` values are never wrapped or reused
fn next_pid(len: usize) -> SchedulerResult<Pid> {
    Pid::try_from(len).map_err(|_| SchedulerError::PidSpaceExhausted(len))
}
