/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Pid, ProcessorId};
use crate::scheduler::ProcessState;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Process {0} not found in scheduler")]
    #[diagnostic(
        code(scheduler::process_not_found),
        help("Process ids are handed out by register(). Check PID validity.")
    )]
    ProcessNotFound(Pid),

    #[error("Process id space exhausted after {0} registrations")]
    #[diagnostic(
        code(scheduler::pid_space_exhausted),
        help("Every Pid value has been handed out; ids are never reused.")
    )]
    PidSpaceExhausted(usize),

    #[error("Invalid processor count: {0}")]
    #[diagnostic(
        code(scheduler::invalid_processor_count),
        help("The processor pool needs at least one slot.")
    )]
    InvalidProcessorCount(usize),

    #[error("Cannot resize processor pool: {running} running, {waiting} waiting")]
    #[diagnostic(
        code(scheduler::processors_busy),
        help("Configure processors before any process is started.")
    )]
    ProcessorsBusy { running: usize, waiting: usize },

    #[error("Process {pid} is already active ({state:?})")]
    #[diagnostic(
        code(scheduler::already_active),
        help("start() is only valid for a process that is not running or queued.")
    )]
    AlreadyActive { pid: Pid, state: ProcessState },

    #[error("Process {pid} does not hold a processor ({state:?})")]
    #[diagnostic(
        code(scheduler::not_running),
        help("schedule() and terminate() are only valid while the process owns a processor.")
    )]
    NotRunning { pid: Pid, state: ProcessState },

    #[error("Process {pid} already owns processor {processor}")]
    #[diagnostic(
        code(scheduler::double_assignment),
        help("Processor bookkeeping is inconsistent. Please report this issue.")
    )]
    DoubleAssignment { pid: Pid, processor: ProcessorId },

    #[error("Wait for process {0} was cancelled")]
    #[diagnostic(
        code(scheduler::cancelled),
        help("The process was withdrawn from its ready queue and may be started again.")
    )]
    Cancelled(Pid),

    #[error("Process {pid} timed out after {waited_ms}ms waiting for a processor")]
    #[diagnostic(
        code(scheduler::timeout),
        help("The process was withdrawn from its ready queue and may be started again.")
    )]
    Timeout { pid: Pid, waited_ms: u64 },

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(scheduler::invalid_config),
        help("Invalid configuration. Review configuration parameters.")
    )]
    InvalidConfig(String),
}

impl SchedulerError {
    /// True when a blocked caller gave up without being assigned a processor
    #[inline]
    #[must_use]
    pub const fn is_aborted_wait(&self) -> bool {
        matches!(self, Self::Cancelled(_) | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serializes_tagged() {
        let err = SchedulerError::NotRunning {
            pid: 3,
            state: ProcessState::Unstarted,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"error_type\":\"not_running\""));
        assert!(json.contains("\"pid\":3"));
    }

    #[test]
    fn test_aborted_wait_classification() {
        assert!(SchedulerError::Cancelled(1).is_aborted_wait());
        assert!(SchedulerError::Timeout { pid: 1, waited_ms: 5 }.is_aborted_wait());
        assert!(!SchedulerError::ProcessNotFound(1).is_aborted_wait());
    }
}
