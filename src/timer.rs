//! Deferred-callback scheduling for the UI thread.
//!
//! Animation completion, next-tick continuations and focus retries are not
//! threads: they are entries in a [`TimerQueue`] that the host event loop
//! fires by calling into the owner once per tick. Each entry is identified
//! by a [`TimerToken`]; cancelling the token guarantees the entry never fires.
//!
//! Entries scheduled while a batch is firing (including zero-delay ones) run
//! on the *next* batch, which models "one event loop tick later".

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic tests and replays
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move time forward; clones of this clock observe the change
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// Handle to a scheduled entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

#[derive(Debug)]
struct Entry<T> {
    token: TimerToken,
    due: Instant,
    payload: T,
}

/// Queue of payloads waiting for their due time
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `payload` to become due at `now + delay`
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> TimerToken {
        let token = TimerToken(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            token,
            due: now + delay,
            payload,
        });
        token
    }

    /// Invalidate a scheduled entry. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }

    /// Token boundary for a firing batch: entries scheduled after this call
    /// are not eligible until the next batch.
    pub fn horizon(&self) -> TimerToken {
        TimerToken(self.next_id)
    }

    /// Remove and return the earliest entry due at `now` that was scheduled
    /// before `horizon`. Entries with equal due times fire in schedule order.
    pub fn pop_due(&mut self, now: Instant, horizon: TimerToken) -> Option<(TimerToken, T)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now && e.token < horizon)
            .min_by_key(|(_, e)| (e.due, e.token))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(index);
        Some((entry.token, entry.payload))
    }

    /// Earliest due time, for hosts that want to sleep until the next entry
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
