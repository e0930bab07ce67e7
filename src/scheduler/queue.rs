/*!
 * Ready Queues
 * One FIFO per priority level, kept in a sparse ordered map
 */

use super::types::PriorityOrder;
use crate::core::types::{Pid, Priority};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Default)]
pub(super) struct ReadyQueues {
    levels: BTreeMap<Priority, VecDeque<Pid>>,
    len: usize,
}

impl ReadyQueues {
    /// Create with empty queues for levels `0..preallocated`
    pub fn new(preallocated: Priority) -> Self {
        Self {
            levels: (0..preallocated).map(|p| (p, VecDeque::new())).collect(),
            len: 0,
        }
    }

    /// Append to the tail of the level's queue, creating the level on demand
    pub fn push(&mut self, priority: Priority, pid: Pid) {
        self.levels.entry(priority).or_default().push_back(pid);
        self.len += 1;
    }

    /// Most urgent non-empty level
    pub fn most_urgent(&self, order: PriorityOrder) -> Option<Priority> {
        let mut non_empty = self.levels.iter().filter(|(_, q)| !q.is_empty());
        let found = match order {
            PriorityOrder::HigherFirst => non_empty.next_back(),
            PriorityOrder::LowerFirst => non_empty.next(),
        };
        found.map(|(level, _)| *level)
    }

    /// Head of the most urgent non-empty level, left in place
    pub fn peek(&self, order: PriorityOrder) -> Option<(Priority, Pid)> {
        let level = self.most_urgent(order)?;
        let pid = *self.levels.get(&level)?.front()?;
        Some((level, pid))
    }

    /// Pop the head of the most urgent non-empty level
    pub fn pop(&mut self, order: PriorityOrder) -> Option<(Priority, Pid)> {
        let level = self.most_urgent(order)?;
        let pid = self.levels.get_mut(&level)?.pop_front()?;
        self.len -= 1;
        Some((level, pid))
    }

    /// Withdraw a process from its level; false if it was not queued
    pub fn remove(&mut self, priority: Priority, pid: Pid) -> bool {
        let Some(queue) = self.levels.get_mut(&priority) else {
            return false;
        };
        match queue.iter().position(|&p| p == pid) {
            Some(pos) => {
                queue.remove(pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Non-empty levels in dispatch order
    pub fn snapshot(&self, order: PriorityOrder) -> Vec<(Priority, Vec<Pid>)> {
        let mut out: Vec<_> = self
            .levels
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(level, q)| (*level, q.iter().copied().collect()))
            .collect();
        if order == PriorityOrder::HigherFirst {
            out.reverse();
        }
        out
    }
}
