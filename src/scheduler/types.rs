/*!
 * Scheduler Types
 * Domain types for process state, dispatch policy and statistics
 */

use crate::core::types::{Pid, Priority, ProcessorId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Per-process lifecycle state
///
/// `Unstarted -> Running -> (Ready -> Running)* -> Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Registered (or withdrawn from a wait) and not contending for a processor
    Unstarted,
    /// Parked in the ready queue for its priority
    Ready,
    /// Holding a processor
    Running,
    /// Released its processor through terminate()
    Terminated,
}

impl ProcessState {
    /// Whether start() is accepted in this state
    #[inline(always)]
    #[must_use]
    pub const fn can_start(&self) -> bool {
        matches!(self, Self::Unstarted | Self::Terminated)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Which end of the priority range is dispatched first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityOrder {
    /// Larger priority values are more urgent
    #[default]
    HigherFirst,
    /// Smaller priority values are more urgent
    LowerFirst,
}

impl PriorityOrder {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "higher_first" | "higher" | "desc" => Ok(Self::HigherFirst),
            "lower_first" | "lower" | "asc" => Ok(Self::LowerFirst),
            _ => Err(format!(
                "Invalid priority order '{}'. Valid: higher_first, lower_first",
                s
            )),
        }
    }

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HigherFirst => "higher_first",
            Self::LowerFirst => "lower_first",
        }
    }

    /// True when `a` is strictly more urgent than `b`
    #[inline]
    #[must_use]
    pub fn more_urgent(&self, a: Priority, b: Priority) -> bool {
        match self {
            Self::HigherFirst => a > b,
            Self::LowerFirst => a < b,
        }
    }
}

/// What a yielding process does when others are waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YieldPolicy {
    /// Hand the processor to the best waiter and contend again like any other process
    #[default]
    Requeue,
    /// Keep the processor if strictly more urgent than every waiter, otherwise requeue
    RetainIfMoreUrgent,
}

impl YieldPolicy {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "requeue" => Ok(Self::Requeue),
            "retain_if_more_urgent" | "retain" => Ok(Self::RetainIfMoreUrgent),
            _ => Err(format!(
                "Invalid yield policy '{}'. Valid: requeue, retain_if_more_urgent",
                s
            )),
        }
    }

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requeue => "requeue",
            Self::RetainIfMoreUrgent => "retain_if_more_urgent",
        }
    }
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::from_str(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(PriorityOrder);
string_serde!(YieldPolicy);

/// Scheduler statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub registered: u64,
    /// start()/schedule() calls that found a free processor right away
    pub immediate_assignments: u64,
    /// Processors handed to a parked waiter
    pub dispatches: u64,
    pub enqueued: u64,
    pub yields: u64,
    pub terminations: u64,
    pub cancellations: u64,
    pub timeouts: u64,
}

/// Point-in-time view of processor slots and ready queues
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerSnapshot {
    /// Slot index -> owning process
    pub processors: Vec<Option<Pid>>,
    /// Non-empty ready queues in dispatch order, head first
    pub ready: Vec<(Priority, Vec<Pid>)>,
}

impl SchedulerSnapshot {
    #[must_use]
    pub fn running(&self) -> impl Iterator<Item = (ProcessorId, Pid)> + '_ {
        self.processors
            .iter()
            .enumerate()
            .filter_map(|(cpu, slot)| slot.map(|pid| (cpu, pid)))
    }

    #[must_use]
    pub fn waiting(&self) -> usize {
        self.ready.iter().map(|(_, q)| q.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_parsing() {
        assert_eq!(
            PriorityOrder::from_str("higher_first").unwrap(),
            PriorityOrder::HigherFirst
        );
        assert_eq!(
            PriorityOrder::from_str("LOWER").unwrap(),
            PriorityOrder::LowerFirst
        );
        assert!(PriorityOrder::from_str("sideways").is_err());
    }

    #[test]
    fn test_yield_policy_parsing() {
        assert_eq!(YieldPolicy::from_str("requeue").unwrap(), YieldPolicy::Requeue);
        assert_eq!(
            YieldPolicy::from_str("retain").unwrap(),
            YieldPolicy::RetainIfMoreUrgent
        );
        assert!(YieldPolicy::from_str("never").is_err());
    }

    #[test]
    fn test_more_urgent() {
        assert!(PriorityOrder::HigherFirst.more_urgent(7, 3));
        assert!(!PriorityOrder::HigherFirst.more_urgent(3, 3));
        assert!(PriorityOrder::LowerFirst.more_urgent(3, 7));
    }

    #[test]
    fn test_state_predicates() {
        assert!(ProcessState::Unstarted.can_start());
        assert!(ProcessState::Terminated.can_start());
        assert!(!ProcessState::Ready.can_start());
        assert!(!ProcessState::Running.can_start());
        assert!(ProcessState::Ready.is_waiting());
        assert!(ProcessState::Running.is_running());
        assert!(!ProcessState::Ready.is_running());
    }
}
