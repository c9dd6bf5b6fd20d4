//! Deferred-callback queue on a virtual clock.
//!
//! The host's frame loop owns time. It moves the clock forward and drains
//! whatever became due:
//!
//! ```
//! use std::time::Duration;
//! use card_match::schedule::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! timers.schedule(Duration::from_millis(300), "reveal");
//! timers.schedule(Duration::from_millis(100), "flip");
//!
//! assert_eq!(timers.advance(Duration::from_millis(200)), vec!["flip"]);
//! assert_eq!(timers.advance(Duration::from_millis(200)), vec!["reveal"]);
//! assert!(timers.is_empty());
//! ```
//!
//! ## Ordering
//!
//! Timers fire by due time, ties in scheduling order. When the handler of one
//! timer schedules another, use [`TimerQueue::pop_due`]: the clock sits at the
//! firing instant while the handler runs, so the new delay is measured from
//! there, not from the end of the frame.
//!
//! There is no cancellation. Handlers that must ignore stale timers carry a
//! generation tag in the event and compare it on arrival.

use std::time::Duration;

#[derive(Clone, Debug)]
struct Timer<E> {
    seq: u64,
    due: Duration,
    period: Option<Duration>,
    event: E,
}

/// Timers waiting to fire, keyed on a virtual clock.
#[derive(Clone, Debug)]
pub struct TimerQueue<E> {
    now: Duration,
    next_seq: u64,
    timers: Vec<Timer<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            timers: Vec::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    /// Create an empty queue with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// True when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Fire `event` once, `delay` from now.
    pub fn schedule(&mut self, delay: Duration, event: E) {
        self.push(delay, None, event)
    }

    /// Fire `event` every `interval`, first time one interval from now.
    ///
    /// Intervals below one millisecond are raised to one millisecond.
    pub fn schedule_repeating(&mut self, interval: Duration, event: E) {
        let interval = interval.max(Duration::from_millis(1));
        self.push(interval, Some(interval), event)
    }

    /// Move the clock to `until` once every due timer has been popped.
    ///
    /// The clock never moves backwards.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Time of the next pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            seq,
            due: self.now + delay,
            period,
            event,
        });
    }

    fn earliest_due(&self, until: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)
    }
}

impl<E: Clone> TimerQueue<E> {
    /// Pop the earliest timer due at or before `until`.
    ///
    /// The clock moves to that timer's due time. Repeating timers are
    /// re-armed one period later.
    pub fn pop_due(&mut self, until: Duration) -> Option<E> {
        let index = self.earliest_due(until)?;
        let due = self.timers[index].due;
        self.now = self.now.max(due);

        match self.timers[index].period {
            Some(period) => {
                let timer = &mut self.timers[index];
                timer.due += period;
                Some(timer.event.clone())
            }
            None => Some(self.timers.swap_remove(index).event),
        }
    }

    /// Advance the clock by `elapsed` and return every event that fired, in
    /// firing order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<E> {
        let until = self.now + elapsed;
        let mut fired = Vec::new();
        while let Some(event) = self.pop_due(until) {
            fired.push(event);
        }
        self.settle(until);
        fired
    }
}
