use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of "now" for everything that measures a session.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used by headless tests.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Armed {
    interval: Duration,
    next_due: Instant,
}

/// Handle for the recurring session tick.
///
/// At most one tick schedule exists at a time: arming replaces the previous
/// schedule, and a disarmed timer never fires.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    armed: Option<Armed>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule ticks every `interval`, starting one interval after `now`.
    pub fn arm(&mut self, interval: Duration, now: Instant) {
        self.cancel();
        self.armed = Some(Armed {
            interval,
            next_due: now + interval,
        });
    }

    /// Returns true if a schedule was actually cancelled.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.armed.map(|a| a.interval)
    }

    /// Time left until the next tick is due, `None` when disarmed.
    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        self.armed.map(|a| a.next_due.saturating_duration_since(now))
    }

    /// Consume a due tick. Returns false when disarmed or not yet due.
    ///
    /// Missed ticks collapse into one; the next tick is scheduled one
    /// interval after `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.armed.as_mut() {
            Some(armed) if now >= armed.next_due => {
                armed.next_due = now + armed.interval;
                true
            }
            _ => false,
        }
    }
}

/// Whole seconds between `start` and `now`, computed from the single start
/// reference rather than accumulated per tick.
pub fn elapsed_secs(start: Instant, now: Instant) -> u64 {
    now.saturating_duration_since(start).as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(250);

    #[test]
    fn test_new_timer_is_disarmed() {
        let t = Timer::new();
        assert!(!t.is_armed());
        assert_eq!(t.until_due(Instant::now()), None);
    }

    #[test]
    fn test_fire_only_when_due() {
        let clock = ManualClock::new();
        let mut t = Timer::new();
        t.arm(TICK, clock.now());

        assert!(!t.fire(clock.now()));
        clock.advance(Duration::from_millis(249));
        assert!(!t.fire(clock.now()));
        clock.advance(Duration::from_millis(1));
        assert!(t.fire(clock.now()));
        // rescheduled
        assert!(!t.fire(clock.now()));
        assert_eq!(t.until_due(clock.now()), Some(TICK));
    }

    #[test]
    fn test_missed_ticks_collapse() {
        let clock = ManualClock::new();
        let mut t = Timer::new();
        t.arm(TICK, clock.now());

        clock.advance(Duration::from_secs(5));
        assert!(t.fire(clock.now()));
        assert!(!t.fire(clock.now()));
    }

    #[test]
    fn test_cancel_stops_firing() {
        let clock = ManualClock::new();
        let mut t = Timer::new();
        t.arm(TICK, clock.now());

        assert!(t.cancel());
        assert!(!t.cancel());
        clock.advance(Duration::from_secs(1));
        assert!(!t.fire(clock.now()));
    }

    #[test]
    fn test_rearm_replaces_schedule() {
        let clock = ManualClock::new();
        let mut t = Timer::new();
        t.arm(TICK, clock.now());
        t.arm(Duration::from_millis(400), clock.now());

        assert_eq!(t.interval(), Some(Duration::from_millis(400)));
        clock.advance(TICK);
        assert!(!t.fire(clock.now()));
    }

    #[test]
    fn test_elapsed_secs_floors() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(1999));
        assert_eq!(elapsed_secs(start, clock.now()), 1);
        clock.advance(Duration::from_millis(1));
        assert_eq!(elapsed_secs(start, clock.now()), 2);
    }

    #[test]
    fn test_elapsed_secs_never_negative() {
        let clock = ManualClock::new();
        let earlier = clock.now();
        clock.advance(Duration::from_secs(3));
        assert_eq!(elapsed_secs(clock.now(), earlier), 0);
    }
}
