//! Search debouncer: coalesces a keystroke burst into a single refresh.
//!
//! The event loop feeds every edit in via [`Debouncer::note_input`] and
//! calls [`Debouncer::poll`] once per tick; a value pops out only after
//! the input has been quiet for the configured delay. Time is injected as
//! `Instant` arguments so the whole thing tests without sleeping.

use std::time::{Duration, Instant};

/// Trailing-edge debouncer over a string value.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<String>,
    last_input: Option<Instant>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last_input: None,
        }
    }

    /// Records an edit. Supersedes any not-yet-fired value and restarts
    /// the quiet period.
    pub fn note_input(&mut self, value: String, now: Instant) {
        self.pending = Some(value);
        self.last_input = Some(now);
    }

    /// Returns the latest value once the quiet period has elapsed, at
    /// most once per burst.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let fired = self.last_input?;
        if now.duration_since(fired) >= self.delay {
            self.last_input = None;
            self.pending.take()
        } else {
            None
        }
    }

    /// Drops any pending value without firing (e.g. leaving the search
    /// box via escape).
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_input = None;
    }

    /// Whether an edit is waiting for its quiet period.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
