/// Characters per "word" when converting typed characters to WPM.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Per-position classification of the target text against the input buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing typed at this position yet.
    Unmarked,
    Correct,
    Incorrect,
}

/// Derived statistics for the current state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub wpm: u32,
    /// Percentage in `0..=100`.
    pub accuracy: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
        }
    }
}

/// Judges every target position against the typed buffer.
///
/// The result always has one entry per target character. Typed characters
/// past the end of the target get no verdict.
pub fn verdicts(typed: &[char], target: &[char]) -> Vec<Verdict> {
    target
        .iter()
        .enumerate()
        .map(|(idx, expected)| match typed.get(idx) {
            None => Verdict::Unmarked,
            Some(c) if c == expected => Verdict::Correct,
            Some(_) => Verdict::Incorrect,
        })
        .collect()
}

pub fn count_correct(verdicts: &[Verdict]) -> usize {
    verdicts.iter().filter(|v| **v == Verdict::Correct).count()
}

/// Words per minute over correct characters only.
///
/// Elapsed time is floored at one second so the very first reading is finite.
pub fn wpm(correct_chars: usize, elapsed_secs: u64) -> u32 {
    let minutes = (elapsed_secs as f64 / 60.0).max(1.0 / 60.0);
    let wpm = (correct_chars as f64 / CHARS_PER_WORD) / minutes;

    if wpm.is_finite() && wpm > 0.0 {
        wpm.round() as u32
    } else {
        0
    }
}

/// Percentage of typed characters that were correct.
///
/// `typed_len` includes surplus characters typed past the end of the target.
pub fn accuracy(correct_chars: usize, typed_len: usize) -> u32 {
    if typed_len == 0 {
        return 100;
    }

    let pct = (100.0 * correct_chars as f64 / typed_len as f64).round();
    pct.clamp(0.0, 100.0) as u32
}

pub fn derive_stats(correct_chars: usize, typed_len: usize, elapsed_secs: u64) -> Stats {
    Stats {
        wpm: wpm(correct_chars, elapsed_secs),
        accuracy: accuracy(correct_chars, typed_len),
    }
}
