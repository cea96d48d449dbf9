use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::evaluator::{self, Stats, Verdict};

/// Default countdown budget in seconds.
pub const DEFAULT_COUNTDOWN_SECS: u64 = 60;

const COUNTDOWN_TICK: Duration = Duration::from_millis(250);
const COMPLETION_TICK: Duration = Duration::from_millis(400);

/// How a session ends on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Mode {
    /// Ends when `secs` have elapsed since the start.
    Countdown { secs: u64 },
    /// Ends once the input buffer is as long as the target.
    Completion,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Countdown {
            secs: DEFAULT_COUNTDOWN_SECS,
        }
    }
}

impl Mode {
    pub fn tick_interval(&self) -> Duration {
        match self {
            Mode::Countdown { .. } => COUNTDOWN_TICK,
            Mode::Completion => COMPLETION_TICK,
        }
    }

    /// Time budget in seconds, `None` for an untimed run.
    pub fn budget(&self) -> Option<u64> {
        match self {
            Mode::Countdown { secs } => Some(*secs),
            Mode::Completion => None,
        }
    }

    /// Countdown <-> completion, keeping `countdown_secs` for the timed side.
    pub fn toggled(&self, countdown_secs: u64) -> Mode {
        match self {
            Mode::Countdown { .. } => Mode::Completion,
            Mode::Completion => Mode::Countdown {
                secs: countdown_secs,
            },
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Countdown { secs } => write!(f, "{secs}s countdown"),
            Mode::Completion => write!(f, "full text"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Target loaded, nothing typed or started yet.
    Ready,
    Running,
    /// End condition reached; input is disabled until the next reset.
    Ended,
}

/// The one mutable record of a typing run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub(crate) target: Vec<char>,
    pub(crate) typed: Vec<char>,
    pub(crate) verdicts: Vec<Verdict>,
    pub(crate) correct_chars: usize,
    pub(crate) elapsed_secs: u64,
    pub(crate) started_at: Option<Instant>,
    pub(crate) mode: Mode,
    pub(crate) phase: Phase,
    pub(crate) stats: Stats,
}

impl Session {
    pub fn new(target: &str, mode: Mode) -> Self {
        let target: Vec<char> = target.chars().collect();
        let verdicts = vec![Verdict::Unmarked; target.len()];
        Self {
            target,
            typed: Vec::new(),
            verdicts,
            correct_chars: 0,
            elapsed_secs: 0,
            started_at: None,
            mode,
            phase: Phase::Ready,
            stats: Stats::default(),
        }
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn correct_chars(&self) -> usize {
        self.correct_chars
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn has_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn input_enabled(&self) -> bool {
        self.phase != Phase::Ended
    }

    /// Seconds left on the countdown, `None` in completion mode.
    pub fn remaining_secs(&self) -> Option<u64> {
        self.mode
            .budget()
            .map(|budget| budget.saturating_sub(self.elapsed_secs))
    }

    /// Whether the input buffer has reached the end of the target.
    pub fn is_complete(&self) -> bool {
        self.typed.len() >= self.target.len()
    }

    /// Replace the typed buffer and re-judge it against the target.
    pub(crate) fn set_typed(&mut self, buffer: &str) {
        self.typed = buffer.chars().collect();
        self.verdicts = evaluator::verdicts(&self.typed, &self.target);
        self.correct_chars = evaluator::count_correct(&self.verdicts);
    }

    pub(crate) fn refresh_stats(&mut self) -> Stats {
        self.stats =
            evaluator::derive_stats(self.correct_chars, self.typed.len(), self.elapsed_secs);
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let s = Session::new("cat", Mode::default());

        assert_eq!(s.target(), &['c', 'a', 't']);
        assert!(s.typed().is_empty());
        assert_eq!(s.verdicts(), &[Verdict::Unmarked; 3]);
        assert_eq!(s.phase(), Phase::Ready);
        assert!(!s.is_running());
        assert!(s.input_enabled());
        assert_eq!(s.remaining_secs(), Some(DEFAULT_COUNTDOWN_SECS));
        assert_eq!(s.stats(), Stats::default());
    }

    #[test]
    fn test_set_typed_rejudges() {
        let mut s = Session::new("cat", Mode::Completion);

        s.set_typed("cot");
        assert_eq!(s.correct_chars(), 2);
        assert!(s.is_complete());

        s.set_typed("c");
        assert_eq!(s.correct_chars(), 1);
        assert_eq!(
            s.verdicts(),
            &[Verdict::Correct, Verdict::Unmarked, Verdict::Unmarked]
        );
        assert!(!s.is_complete());
    }

    #[test]
    fn test_refresh_stats_uses_elapsed() {
        let mut s = Session::new("cat", Mode::Completion);
        s.set_typed("cat");
        s.elapsed_secs = 60;

        assert_eq!(s.refresh_stats(), Stats { wpm: 1, accuracy: 100 });
    }

    #[test]
    fn test_remaining_saturates() {
        let mut s = Session::new("cat", Mode::Countdown { secs: 10 });
        s.elapsed_secs = 25;
        assert_eq!(s.remaining_secs(), Some(0));
    }

    #[test]
    fn test_mode_toggle_and_intervals() {
        let m = Mode::Countdown { secs: 30 };
        assert_eq!(m.tick_interval(), Duration::from_millis(250));
        assert_eq!(m.toggled(30), Mode::Completion);
        assert_eq!(Mode::Completion.tick_interval(), Duration::from_millis(400));
        assert_eq!(Mode::Completion.toggled(45), Mode::Countdown { secs: 45 });
        assert_eq!(Mode::Completion.budget(), None);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Countdown { secs: 60 }.to_string(), "60s countdown");
        assert_eq!(Mode::Completion.to_string(), "full text");
    }
}
