//! Time sources and the map tick timer
//!
//! Store logic never reads the wall clock directly: it asks a [`Clock`], so
//! tests can feed synthetic timestamps.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Source of the current time
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Timestamp)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta.as_millis() as Timestamp);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

/// Fires once per interval as frame deltas accumulate
pub struct TickTimer {
    /// Interval between ticks
    interval: Duration,
    /// Time since last tick
    since_last_tick: Duration,
}

impl TickTimer {
    /// Create a new timer
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_last_tick: Duration::ZERO,
        }
    }

    /// Update time and return true if a tick should occur
    pub fn update(&mut self, delta: Duration) -> bool {
        self.since_last_tick += delta;

        if self.since_last_tick >= self.interval {
            // A long stall yields one tick, not a burst
            let interval_ns = self.interval.as_nanos().max(1);
            let carry = self.since_last_tick.as_nanos() % interval_ns;
            self.since_last_tick = Duration::from_nanos(carry as u64);
            true
        } else {
            false
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reset the timer
    pub fn reset(&mut self) {
        self.since_last_tick = Duration::ZERO;
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1)) // Default: tick every second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(1_000);
        let other = clock.clone();
        clock.advance(Duration::from_secs(2));
        assert_eq!(other.now(), 3_000);
        other.set(10);
        assert_eq!(clock.now(), 10);
    }

    #[test]
    fn test_tick_timer() {
        let mut timer = TickTimer::new(Duration::from_millis(1000));
        assert!(!timer.update(Duration::from_millis(400)));
        assert!(!timer.update(Duration::from_millis(500)));
        assert!(timer.update(Duration::from_millis(200)));
        // 100ms carried over
        assert!(!timer.update(Duration::from_millis(850)));
        assert!(timer.update(Duration::from_millis(50)));
    }

    #[test]
    fn test_tick_timer_stall_fires_once() {
        let mut timer = TickTimer::new(Duration::from_millis(1000));
        assert!(timer.update(Duration::from_millis(5_500)));
        assert!(!timer.update(Duration::from_millis(400)));
        assert!(timer.update(Duration::from_millis(100)));
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800_000);
    }
}
