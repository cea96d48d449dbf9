use std::time::Duration;

use tracing::{debug, info};

use crate::best::{BestScoreTracker, KeyValueStore};
use crate::session::{Mode, Phase, Session};
use crate::surface::{ClockReading, Surface};
use crate::timer::{elapsed_secs, Clock, Timer};

/// A typing test: the session record plus everything that acts on it.
///
/// Each operation runs to completion before the next one is dispatched, so
/// there is no locking. The tick schedule lives next to the session and is
/// cancelled on every path out of the running phase.
#[derive(Debug)]
pub struct TypingTest<U: Surface, K: KeyValueStore, C: Clock> {
    session: Session,
    timer: Timer,
    surface: U,
    best: BestScoreTracker<K>,
    clock: C,
}

impl<U: Surface, K: KeyValueStore, C: Clock> TypingTest<U, K, C> {
    pub fn new(target: &str, mode: Mode, surface: U, store: K, clock: C) -> Self {
        let mut test = Self {
            session: Session::new(target, mode),
            timer: Timer::new(),
            surface,
            best: BestScoreTracker::new(store),
            clock,
        };
        let best = test.best.load();
        test.surface.render_best(best);
        test.render_fresh();
        test
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut U {
        &mut self.surface
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &K {
        self.best.store()
    }

    pub fn best(&self) -> Option<u32> {
        self.best.load()
    }

    /// Begin timing. Does nothing when already running, after the session
    /// has ended, or without a target. Returns whether the session started.
    pub fn start(&mut self) -> bool {
        if self.session.phase != Phase::Ready || self.session.target.is_empty() {
            return false;
        }

        let now = self.clock.now();
        self.session.phase = Phase::Running;
        self.session.started_at = Some(now);
        self.timer.arm(self.session.mode.tick_interval(), now);

        info!(
            target_len = self.session.target.len(),
            mode = %self.session.mode,
            "session started"
        );
        true
    }

    /// Tear down the current run and load `target` for a fresh one.
    pub fn reset(&mut self, target: &str) {
        self.timer.cancel();
        self.session = Session::new(target, self.session.mode);
        self.render_fresh();
        debug!(target_len = self.session.target.len(), "session reset");
    }

    /// Restart on the same target.
    pub fn restart(&mut self) {
        let target: String = self.session.target.iter().collect();
        self.reset(&target);
    }

    /// Switch modes. The budget is fixed per session, so this restarts.
    pub fn set_mode(&mut self, mode: Mode) {
        debug!(%mode, "mode changed");
        self.session.mode = mode;
        self.restart();
    }

    /// Finish the run: stop ticking, lock input, publish final numbers and
    /// record the best score. Returns false if the run had already ended.
    pub fn end(&mut self) -> bool {
        if self.session.phase == Phase::Ended {
            return false;
        }

        let now = self.clock.now();
        self.timer.cancel();

        if let Some(start) = self.session.started_at {
            let mut elapsed = elapsed_secs(start, now);
            if let Some(budget) = self.session.mode.budget() {
                elapsed = elapsed.min(budget);
            }
            self.session.elapsed_secs = elapsed;
        }

        self.session.phase = Phase::Ended;
        self.surface.set_input_enabled(false);

        let stats = self.session.refresh_stats();
        self.surface.render_stats(stats);
        self.surface.render_clock(self.clock_reading());

        info!(
            wpm = stats.wpm,
            accuracy = stats.accuracy,
            elapsed_secs = self.session.elapsed_secs,
            "session ended"
        );

        if let Some(best) = self.best.record(stats.wpm) {
            self.surface.render_best(Some(best));
            self.surface.celebrate_new_best(best);
        }
        true
    }

    /// Evaluate the current contents of the input buffer.
    pub fn on_input(&mut self, buffer: &str) {
        if !self.session.input_enabled() {
            return;
        }

        self.session.set_typed(buffer);
        self.surface.render_verdicts(&self.session.verdicts);

        let stats = self.session.refresh_stats();
        self.surface.render_stats(stats);

        // the final keystroke is already reflected in the stats above
        if self.session.mode == Mode::Completion
            && !self.session.target.is_empty()
            && self.session.is_complete()
        {
            self.end();
        }
    }

    /// Handle a tick if one is due. Returns whether anything happened.
    pub fn on_tick(&mut self) -> bool {
        let now = self.clock.now();
        if !self.timer.fire(now) {
            return false;
        }
        let Some(start) = self.session.started_at else {
            return false;
        };

        self.session.elapsed_secs = elapsed_secs(start, now);

        match self.session.mode {
            Mode::Countdown { secs } => {
                let remaining = secs.saturating_sub(self.session.elapsed_secs);
                self.surface.render_clock(ClockReading::Remaining(remaining));
                if remaining == 0 {
                    self.end();
                    return true;
                }
            }
            Mode::Completion => {
                self.surface
                    .render_clock(ClockReading::Elapsed(self.session.elapsed_secs));
            }
        }

        let stats = self.session.refresh_stats();
        self.surface.render_stats(stats);
        true
    }

    /// How long the event loop may wait before the next tick is due.
    pub fn next_tick_in(&self) -> Option<Duration> {
        self.timer.until_due(self.clock.now())
    }

    pub fn clock_reading(&self) -> ClockReading {
        match self.session.mode {
            Mode::Countdown { .. } => {
                ClockReading::Remaining(self.session.remaining_secs().unwrap_or(0))
            }
            Mode::Completion if self.session.started_at.is_none() => ClockReading::Untimed,
            Mode::Completion => ClockReading::Elapsed(self.session.elapsed_secs),
        }
    }

    fn render_fresh(&mut self) {
        self.surface.render_verdicts(&self.session.verdicts);
        self.surface.render_clock(self.clock_reading());
        self.surface.render_stats(self.session.stats);
        self.surface.set_input_enabled(true);
    }
}
