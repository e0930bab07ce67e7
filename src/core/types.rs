/*!
 * Core Types
 * Common identifier types used across the scheduler
 */

/// Process ID type (assigned 0, 1, 2, ... in registration order)
pub type Pid = u32;

/// Priority level (non-negative, meaning of "more urgent" set by `PriorityOrder`)
pub type Priority = u32;

/// Index of a processor slot in the pool
pub type ProcessorId = usize;
