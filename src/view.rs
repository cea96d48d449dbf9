use std::time::{Duration, Instant};

use crate::evaluator::{Stats, Verdict};
use crate::surface::{ClockReading, Surface};

/// How long the border stays highlighted after a new best.
pub const PULSE_DURATION: Duration = Duration::from_millis(700);

/// Short highlight shown when a personal best is beaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub wpm: u32,
    pub started_at: Instant,
}

impl Pulse {
    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) < PULSE_DURATION
    }
}

/// Everything the terminal frontend draws, as last reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub verdicts: Vec<Verdict>,
    pub clock: ClockReading,
    pub stats: Stats,
    pub input_enabled: bool,
    pub best: Option<u32>,
    pub pulse: Option<Pulse>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            verdicts: Vec::new(),
            clock: ClockReading::Untimed,
            stats: Stats::default(),
            input_enabled: true,
            best: None,
            pulse: None,
        }
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.pulse.is_some_and(|p| p.is_active(now))
    }

    /// Drop a pulse that has run its course. Returns true while one is active.
    pub fn update_pulse(&mut self, now: Instant) -> bool {
        if self.is_pulsing(now) {
            return true;
        }
        self.pulse = None;
        false
    }

    pub fn clock_label(&self) -> String {
        match self.clock {
            ClockReading::Remaining(secs) | ClockReading::Elapsed(secs) => format!("{secs}s"),
            ClockReading::Untimed => "—".to_string(),
        }
    }

    pub fn best_label(&self) -> String {
        match self.best {
            Some(wpm) => format!("{wpm} WPM"),
            None => "—".to_string(),
        }
    }
}

impl Surface for View {
    fn render_verdicts(&mut self, verdicts: &[Verdict]) {
        self.verdicts.clear();
        self.verdicts.extend_from_slice(verdicts);
    }

    fn render_clock(&mut self, clock: ClockReading) {
        self.clock = clock;
    }

    fn render_stats(&mut self, stats: Stats) {
        self.stats = stats;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn render_best(&mut self, best: Option<u32>) {
        self.best = best;
    }

    fn celebrate_new_best(&mut self, wpm: u32) {
        self.pulse = Some(Pulse {
            wpm,
            started_at: Instant::now(),
        });
    }
}
