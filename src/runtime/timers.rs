//! Virtual-clock timer queue
//!
//! Time only moves when the runtime advances it, so delays are deterministic
//! in tests and replays.

use std::collections::BTreeMap;

use crate::commands::TimerKey;

#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    /// Pending timers keyed by (deadline, insertion sequence)
    pending: BTreeMap<(u64, u64), TimerKey>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `key` to fire `delay_ms` from now
    pub fn schedule(&mut self, key: TimerKey, delay_ms: u64) {
        let deadline = self.now_ms.saturating_add(delay_ms);
        self.pending.insert((deadline, self.next_seq), key);
        self.next_seq += 1;
    }

    /// Forget a pending timer. Returns whether it was still pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        let before = self.pending.len();
        self.pending.retain(|_, k| *k != key);
        self.pending.len() != before
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline
    pub fn pop_due(&mut self, until: u64) -> Option<TimerKey> {
        let (&(deadline, seq), _) = self.pending.iter().next()?;
        if deadline > until {
            return None;
        }
        let key = self.pending.remove(&(deadline, seq))?;
        self.now_ms = self.now_ms.max(deadline);
        Some(key)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
