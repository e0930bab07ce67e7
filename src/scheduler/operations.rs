/*!
 * Scheduler Core Operations
 * Configure, register, start, schedule, terminate and cancel
 */

use super::config::validate_processor_count;
use super::state::{Admission, SchedulerState};
use super::traits::{ProcessRegistry, SchedulerControl};
use super::types::{ProcessState, YieldPolicy};
use super::Scheduler;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::{Pid, Priority, ProcessorId};
use crate::monitoring::SchedulerEvent;
use parking_lot::MutexGuard;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

impl Scheduler {
    /// Resize the processor pool to `count` free slots
    ///
    /// Rejected while any process is running or waiting.
    pub fn configure_processors(&self, count: usize) -> SchedulerResult<()> {
        validate_processor_count(count)?;

        let mut state = self.state.lock();
        state.resize(count)?;
        self.emit(SchedulerEvent::ProcessorsConfigured { count });
        info!(processors = count, "processor pool configured");
        Ok(())
    }

    /// Register a process; ids are handed out 0, 1, 2, ... and never reused
    ///
    /// Fails with [`SchedulerError::PidSpaceExhausted`] once every `Pid` value
    /// has been handed out.
    pub fn register(&self, priority: Priority) -> SchedulerResult<Pid> {
        let mut state = self.state.lock();
        let pid = state.register(priority)?;
        self.stats.inc_registered();
        self.emit(SchedulerEvent::Registered { pid, priority });
        debug!(pid, priority, "registered process");
        Ok(pid)
    }

    /// Block until `pid` owns a processor
    #[instrument(level = "trace", skip(self))]
    pub fn start(&self, pid: Pid) -> SchedulerResult<ProcessorId> {
        self.start_until(pid, None)
    }

    /// Like [`Scheduler::start`], giving up after `timeout`
    #[instrument(level = "trace", skip(self))]
    pub fn start_timeout(&self, pid: Pid, timeout: Duration) -> SchedulerResult<ProcessorId> {
        self.start_until(pid, Some(Instant::now() + timeout))
    }

    fn start_until(&self, pid: Pid, deadline: Option<Instant>) -> SchedulerResult<ProcessorId> {
        let mut state = self.state.lock();
        let record = state.record(pid)?;
        if !record.startable() {
            return Err(SchedulerError::AlreadyActive {
                pid,
                state: record.state,
            });
        }
        self.admit(&mut state, pid, deadline)
    }

    /// Yield the processor, hand it to the most urgent waiter, then contend again
    #[instrument(level = "trace", skip(self))]
    pub fn schedule(&self, pid: Pid) -> SchedulerResult<ProcessorId> {
        self.schedule_until(pid, None)
    }

    /// Like [`Scheduler::schedule`], giving up on re-admission after `timeout`
    #[instrument(level = "trace", skip(self))]
    pub fn schedule_timeout(&self, pid: Pid, timeout: Duration) -> SchedulerResult<ProcessorId> {
        self.schedule_until(pid, Some(Instant::now() + timeout))
    }

    fn schedule_until(&self, pid: Pid, deadline: Option<Instant>) -> SchedulerResult<ProcessorId> {
        let mut state = self.state.lock();

        if state.yield_policy == YieldPolicy::RetainIfMoreUrgent {
            let record = state.record(pid)?;
            if let Some(cpu) = record.assigned.filter(|_| record.state.is_running()) {
                if state.outranks_waiters(pid)? {
                    self.stats.inc_yields();
                    self.emit(SchedulerEvent::Retained { pid, processor: cpu });
                    debug!(pid, processor = cpu, "yield retained processor");
                    return Ok(cpu);
                }
            }
        }

        let cpu = state.release(pid)?;
        self.stats.inc_yields();
        self.emit(SchedulerEvent::Released { pid, processor: cpu });
        debug!(pid, processor = cpu, "freed processor on yield");

        self.dispatch_freed(&mut state, cpu)?;
        self.admit(&mut state, pid, deadline)
    }

    /// Release the processor and wake the most urgent waiter; does not re-admit
    #[instrument(level = "trace", skip(self))]
    pub fn terminate(&self, pid: Pid) -> SchedulerResult<()> {
        let mut state = self.state.lock();
        let cpu = state.release(pid)?;
        state.record_mut(pid)?.state = ProcessState::Terminated;
        self.stats.inc_terminations();
        self.emit(SchedulerEvent::Released { pid, processor: cpu });
        self.emit(SchedulerEvent::Terminated { pid });
        debug!(pid, processor = cpu, "freed processor on terminate");

        self.dispatch_freed(&mut state, cpu)?;
        Ok(())
    }

    /// Abort the wait of a parked process
    ///
    /// The process leaves its ready queue and returns to `Unstarted`; its
    /// blocked `start`/`schedule` call returns [`SchedulerError::Cancelled`].
    /// Returns `false` if the process was not waiting.
    pub fn cancel(&self, pid: Pid) -> SchedulerResult<bool> {
        let mut state = self.state.lock();
        if !state.withdraw(pid)? {
            return Ok(false);
        }
        let record = state.record_mut(pid)?;
        record.cancel_pending = true;
        record.wakeup.notify_one();

        self.stats.inc_cancellations();
        self.emit(SchedulerEvent::Cancelled { pid });
        info!(pid, "cancelled wait for processor");
        Ok(true)
    }

    /// Immediate assignment if a processor is free, else enqueue and park
    fn admit(
        &self,
        state: &mut MutexGuard<'_, SchedulerState>,
        pid: Pid,
        deadline: Option<Instant>,
    ) -> SchedulerResult<ProcessorId> {
        match state.admit(pid)? {
            Admission::Assigned(cpu) => {
                self.stats.inc_immediate();
                self.emit(SchedulerEvent::Allocated { pid, processor: cpu });
                debug!(pid, processor = cpu, "allocated processor");
                Ok(cpu)
            }
            Admission::Queued(priority) => {
                self.stats.inc_enqueued();
                self.emit(SchedulerEvent::Enqueued { pid, priority });
                debug!(pid, priority, "no free processor, enqueued");
                self.await_assignment(state, pid, deadline)
            }
        }
    }

    /// Give a just-freed processor to the most urgent waiter, if any
    fn dispatch_freed(
        &self,
        state: &mut MutexGuard<'_, SchedulerState>,
        cpu: ProcessorId,
    ) -> SchedulerResult<()> {
        if let Some((pid, priority)) = state.dispatch(cpu)? {
            self.stats.inc_dispatches();
            self.emit(SchedulerEvent::Dispatched {
                pid,
                processor: cpu,
                priority,
            });
            debug!(pid, processor = cpu, priority, "dispatched waiter");
        }
        Ok(())
    }
}

impl ProcessRegistry for Scheduler {
    fn configure_processors(&self, count: usize) -> SchedulerResult<()> {
        Scheduler::configure_processors(self, count)
    }

    fn register(&self, priority: Priority) -> SchedulerResult<Pid> {
        Scheduler::register(self, priority)
    }
}

impl SchedulerControl for Scheduler {
    fn start(&self, pid: Pid) -> SchedulerResult<ProcessorId> {
        Scheduler::start(self, pid)
    }

    fn schedule(&self, pid: Pid) -> SchedulerResult<ProcessorId> {
        Scheduler::schedule(self, pid)
    }

    fn terminate(&self, pid: Pid) -> SchedulerResult<()> {
        Scheduler::terminate(self, pid)
    }
}
