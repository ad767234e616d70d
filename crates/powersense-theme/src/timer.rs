//! Clocks and the deferred-step queue.
//!
//! Transitions are not driven by sleeping. The controller enqueues steps with
//! a due time and the host runs whatever is due, either against a real
//! monotonic clock or against a [`ManualClock`] it advances itself.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;

    /// Moves the clock forward, returning `false` if this clock cannot be
    /// moved by the caller.
    fn advance(&self, _by: Duration) -> bool {
        false
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn advance(&self, by: Duration) -> bool {
        self.now.set(self.now.get() + by);
        true
    }
}

/// Wall-clock time elapsed since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    item: T,
}

/// Items ordered by due time; items due at the same time keep the order in
/// which they were scheduled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn schedule(&mut self, due: Duration, item: T) {
        let idx = self.entries.partition_point(|e| e.due <= due);
        self.entries.insert(idx, Entry { due, item });
    }

    /// Removes and returns the earliest item due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        if self.entries.first()?.due > now {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.due, entry.item))
    }

    /// Removes and returns the earliest item regardless of its due time.
    pub fn pop_next(&mut self) -> Option<(Duration, T)> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.due, entry.item))
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.due)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        assert!(clock.advance(ms(25)));
        assert_eq!(handle.now(), ms(25));
        handle.set(ms(5));
        assert_eq!(clock.now(), ms(5));
    }

    #[test]
    fn test_system_clock_cannot_be_advanced() {
        let clock = SystemClock::new();
        assert!(!clock.advance(ms(10)));
    }

    #[test]
    fn test_queue_orders_by_due_then_insertion() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(30), "c");
        queue.schedule(ms(10), "a");
        queue.schedule(ms(10), "b");
        assert_eq!(queue.next_due(), Some(ms(10)));

        assert_eq!(queue.pop_due(ms(5)), None);
        assert_eq!(queue.pop_due(ms(10)), Some((ms(10), "a")));
        assert_eq!(queue.pop_due(ms(10)), Some((ms(10), "b")));
        assert_eq!(queue.pop_due(ms(10)), None);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_next(), Some((ms(30), "c")));
        assert!(queue.is_empty());
    }
}
