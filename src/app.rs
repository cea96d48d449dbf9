use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::best::KeyValueStore;
use crate::config::Config;
use crate::engine::TypingTest;
use crate::samples::SampleSource;
use crate::session::Mode;
use crate::timer::Clock;
use crate::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal frontend state: owns the input buffer and forwards it to the
/// typing test, which reports back into the `View`.
#[derive(Debug)]
pub struct App<K: KeyValueStore, C: Clock> {
    pub test: TypingTest<View, K, C>,
    pub source: SampleSource,
    pub countdown_secs: u64,
    buffer: String,
}

impl<K: KeyValueStore, C: Clock> App<K, C> {
    pub fn new(source: SampleSource, mode: Mode, countdown_secs: u64, store: K, clock: C) -> Self {
        let test = TypingTest::new(source.text(), mode, View::new(), store, clock);
        Self {
            test,
            source,
            countdown_secs,
            buffer: String::new(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn view(&self) -> &View {
        self.test.surface()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if self.test.session().input_enabled() {
            match key.code {
                KeyCode::Esc => return Flow::Quit,
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    // first printable key starts the clock
                    self.test.start();
                    self.buffer.push(c);
                    self.test.on_input(&self.buffer);
                }
                KeyCode::Backspace => {
                    self.buffer.pop();
                    self.test.on_input(&self.buffer);
                }
                KeyCode::Enter => {
                    self.test.start();
                }
                KeyCode::Tab => self.toggle_mode(),
                KeyCode::Left => self.restart(),
                KeyCode::Right => self.next_sample(),
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Char('r') | KeyCode::Left => self.restart(),
                KeyCode::Char('n') | KeyCode::Right => self.next_sample(),
                KeyCode::Char('m') | KeyCode::Tab => self.toggle_mode(),
                _ => {}
            }
        }
        Flow::Continue
    }

    /// Forward a tick and age the new-best highlight.
    pub fn on_tick(&mut self) {
        self.test.on_tick();
        self.test.surface_mut().update_pulse(Instant::now());
    }

    pub fn restart(&mut self) {
        self.buffer.clear();
        self.test.restart();
    }

    pub fn select(&mut self, source: SampleSource) {
        self.buffer.clear();
        self.test.reset(source.text());
        self.source = source;
    }

    pub fn next_sample(&mut self) {
        let next = self.source.next();
        self.select(next);
    }

    pub fn toggle_mode(&mut self) {
        let mode = self.test.session().mode().toggled(self.countdown_secs);
        self.buffer.clear();
        self.test.set_mode(mode);
    }

    /// Preferences to persist, keeping `prior.sample` when a custom prompt is
    /// in use.
    pub fn config(&self, prior: &Config) -> Config {
        let sample = match self.source {
            SampleSource::Builtin(idx) => idx,
            SampleSource::Custom(_) => prior.sample,
        };
        Config {
            sample,
            mode: self.test.session().mode(),
            countdown_secs: self.countdown_secs,
        }
    }
}
