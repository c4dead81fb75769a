//! Timers
//!
//! `setTimeout` on a virtual clock. Time only moves when the host calls
//! `Document::advance_time`, which makes delayed behavior deterministic.

use std::collections::BTreeMap;
use std::fmt;

use crate::Document;

/// Timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

type TimerCallback = Box<dyn FnOnce(&mut Document)>;

/// Pending single-shot timers ordered by (due time, id)
#[derive(Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<(u64, TimerId), TimerCallback>,
}

impl TimerQueue {
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn schedule(&mut self, delay_ms: u64, callback: TimerCallback) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due = self.now_ms.saturating_add(delay_ms);
        self.pending.insert((due, id), callback);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, t)| *t == id).copied();
        key.is_some_and(|k| self.pending.remove(&k).is_some())
    }

    /// Pop the earliest timer due at or before `deadline`, advancing the clock to it
    fn pop_due(&mut self, deadline: u64) -> Option<TimerCallback> {
        let (&(due, id), _) = self.pending.iter().next()?;
        if due > deadline {
            return None;
        }
        self.now_ms = due;
        self.pending.remove(&(due, id))
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now_ms", &self.now_ms)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Document {
    /// `setTimeout`: run `callback` once, `delay_ms` after now
    pub fn set_timeout<F>(&mut self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce(&mut Document) + 'static,
    {
        let id = self.timers.schedule(delay_ms, Box::new(callback));
        tracing::trace!(timer = id.0, delay_ms, "timer scheduled");
        id
    }

    /// `clearTimeout`; returns whether the timer was still pending
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// Current host time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Advance the clock, running every timer that comes due (including
    /// timers scheduled by those callbacks). Returns how many ran.
    pub fn advance_time(&mut self, ms: u64) -> usize {
        let deadline = self.timers.now_ms().saturating_add(ms);
        let mut ran = 0;
        while let Some(callback) = self.timers.pop_due(deadline) {
            callback(self);
            ran += 1;
        }
        self.timers.now_ms = deadline;
        ran
    }
}
