/*!
 * Scheduler Limits and Defaults
 *
 * Centralized location for scheduler-wide defaults and thresholds.
 */

use std::time::Duration;

// =============================================================================
// PROCESSOR POOL
// =============================================================================

/// Processor pool size for a freshly constructed scheduler
pub const DEFAULT_PROCESSORS: usize = 1;

/// Upper bound accepted from configuration
/// Keeps an accidental huge value from allocating a giant slot table
pub const MAX_PROCESSORS: usize = 4096;

// =============================================================================
// READY QUEUES
// =============================================================================

/// Priority levels 0..N that have a queue before any process registers
/// Higher levels are created on demand
pub const PREALLOCATED_PRIORITY_LEVELS: u32 = 10;

// =============================================================================
// WAITING
// =============================================================================

/// Waits at or above this length are logged at warn level
pub const SLOW_WAIT_THRESHOLD: Duration = Duration::from_millis(500);
