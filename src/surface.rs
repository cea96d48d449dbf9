use crate::evaluator::{Stats, Verdict};

/// What the clock readout should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockReading {
    /// Countdown seconds left.
    Remaining(u64),
    /// Seconds since the start of an untimed run.
    Elapsed(u64),
    /// Untimed run that has not started.
    Untimed,
}

/// The presentation layer the engine reports to.
///
/// Implementations only render; they never feed state back into the engine
/// from these callbacks.
pub trait Surface {
    fn render_verdicts(&mut self, verdicts: &[Verdict]);
    fn render_clock(&mut self, clock: ClockReading);
    fn render_stats(&mut self, stats: Stats);
    fn set_input_enabled(&mut self, enabled: bool);
    /// `None` when no best score is known.
    fn render_best(&mut self, best: Option<u32>);
    fn celebrate_new_best(&mut self, wpm: u32);
}
