/*!
 * Scheduler Configuration
 *
 * Pool size and dispatch policy, loadable from the environment
 */

use super::types::{PriorityOrder, YieldPolicy};
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::limits::{DEFAULT_PROCESSORS, MAX_PROCESSORS};
use serde::{Deserialize, Serialize};

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Number of processor slots
    pub processors: usize,
    /// Which end of the priority range wins dispatch
    pub priority_order: PriorityOrder,
    /// Whether a yielding process may keep its processor
    pub yield_policy: YieldPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            processors: DEFAULT_PROCESSORS,
            priority_order: PriorityOrder::HigherFirst,
            yield_policy: YieldPolicy::Requeue,
        }
    }
}

impl SchedulerConfig {
    /// Configuration with `n` processors and default policies
    pub fn with_processors(n: usize) -> Self {
        Self {
            processors: n,
            ..Self::default()
        }
    }

    /// Smaller values are more urgent and a yielding process keeps its
    /// processor over less urgent waiters
    pub fn lower_first() -> Self {
        Self {
            priority_order: PriorityOrder::LowerFirst,
            yield_policy: YieldPolicy::RetainIfMoreUrgent,
            ..Self::default()
        }
    }

    /// Load configuration from the environment
    ///
    /// Environment variables:
    /// - SCHED_PROCESSORS: processor count (default: 1)
    /// - SCHED_PRIORITY_ORDER: higher_first | lower_first
    /// - SCHED_YIELD_POLICY: requeue | retain_if_more_urgent
    pub fn from_env() -> SchedulerResult<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("SCHED_PROCESSORS") {
            config.processors = value.trim().parse().map_err(|e| {
                SchedulerError::InvalidConfig(format!("SCHED_PROCESSORS={}: {}", value, e))
            })?;
        }
        if let Ok(value) = std::env::var("SCHED_PRIORITY_ORDER") {
            config.priority_order =
                PriorityOrder::from_str(&value).map_err(SchedulerError::InvalidConfig)?;
        }
        if let Ok(value) = std::env::var("SCHED_YIELD_POLICY") {
            config.yield_policy =
                YieldPolicy::from_str(&value).map_err(SchedulerError::InvalidConfig)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> SchedulerResult<()> {
        validate_processor_count(self.processors)
    }
}

/// Reject pool sizes outside `1..=MAX_PROCESSORS`
pub(crate) fn validate_processor_count(n: usize) -> SchedulerResult<()> {
    if n == 0 || n > MAX_PROCESSORS {
        return Err(SchedulerError::InvalidProcessorCount(n));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_processor() {
        let config = SchedulerConfig::default();
        assert_eq!(config.processors, 1);
        assert_eq!(config.priority_order, PriorityOrder::HigherFirst);
        assert_eq!(config.yield_policy, YieldPolicy::Requeue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_processors_rejected() {
        let config = SchedulerConfig::with_processors(0);
        assert_eq!(
            config.validate(),
            Err(SchedulerError::InvalidProcessorCount(0))
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{"processors": 4, "priority_order": "lower_first"}"#).unwrap();
        assert_eq!(config.processors, 4);
        assert_eq!(config.priority_order, PriorityOrder::LowerFirst);
        assert_eq!(config.yield_policy, YieldPolicy::Requeue);
    }

    #[test]
    fn test_deserialize_rejects_unknown_policy() {
        let result: Result<SchedulerConfig, _> =
            serde_json::from_str(r#"{"yield_policy": "sometimes"}"#);
        assert!(result.is_err());
    }
}
