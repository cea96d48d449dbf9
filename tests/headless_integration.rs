use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use typetest::app::{App, Flow};
use typetest::best::{KeyValueStore, MemoryStore, BEST_WPM_KEY};
use typetest::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use typetest::samples::SampleSource;
use typetest::session::Mode;
use typetest::surface::ClockReading;
use typetest::timer::{Clock, ManualClock};

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn app_for<C: Clock>(
    prompt: &str,
    mode: Mode,
    store: MemoryStore,
    clock: C,
) -> App<MemoryStore, C> {
    App::new(
        SampleSource::Custom(prompt.to_string()),
        mode,
        60,
        store,
        clock,
    )
}

/// Drive the app the way the binary does, for at most `steps` events.
fn pump<C: Clock>(
    app: &mut App<MemoryStore, C>,
    runner: &Runner<TestEventSource, FixedTicker>,
    steps: u32,
) -> Flow {
    for _ in 0..steps {
        match runner.step(app.test.next_tick_in()) {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(k) => {
                if app.handle_key(k) == Flow::Quit {
                    return Flow::Quit;
                }
            }
        }
    }
    Flow::Continue
}

// Headless integration using the runtime + App without a TTY.
// Verifies that a completion-mode run finishes from keystrokes alone.
#[test]
fn headless_completion_flow_ends_on_last_char() {
    let clock = ManualClock::new();
    let mut app = app_for("hi there", Mode::Completion, MemoryStore::new(), &clock);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    for c in "hi there".chars() {
        tx.send(key(c)).unwrap();
    }
    pump(&mut app, &runner, 8);

    let session = app.test.session();
    assert!(session.has_ended(), "typing the whole text should end the run");
    assert!(!app.view().input_enabled);
    assert_eq!(session.correct_chars(), 8);
    assert_eq!(app.view().stats.accuracy, 100);

    // quit from the results state
    tx.send(key('q')).unwrap();
    assert_eq!(pump(&mut app, &runner, 1), Flow::Quit);
}

#[test]
fn headless_countdown_ends_by_time() {
    let clock = ManualClock::new();
    let mut app = app_for(
        "the quick brown fox",
        Mode::Countdown { secs: 2 },
        MemoryStore::new(),
        &clock,
    );

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    for c in "the q".chars() {
        tx.send(key(c)).unwrap();
    }
    pump(&mut app, &runner, 5);
    assert!(app.test.session().is_running());

    // simulated time moves in tick-sized steps; the runner produces ticks on timeout
    for _ in 0..8 {
        clock.advance(Duration::from_millis(250));
        pump(&mut app, &runner, 1);
    }

    let session = app.test.session();
    assert!(session.has_ended(), "countdown should end the run");
    assert_eq!(session.elapsed_secs(), 2);
    assert_eq!(app.view().clock, ClockReading::Remaining(0));
    // 5 correct chars over 2 seconds = 30 wpm
    assert_eq!(app.view().stats.wpm, 30);

    // further ticks change nothing
    let frozen = session.clone();
    clock.advance(Duration::from_secs(5));
    pump(&mut app, &runner, 3);
    assert_eq!(app.test.session(), &frozen);
}

#[test]
fn headless_best_score_across_runs() {
    let clock = ManualClock::new();
    let store = MemoryStore::with_entry(BEST_WPM_KEY, "40");
    let target = "a".repeat(400);
    let mut app = app_for(&target, Mode::Countdown { secs: 60 }, store, &clock);

    // first run: 275 correct chars in a minute = 55 wpm
    for _ in 0..275 {
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
    }
    clock.advance(Duration::from_secs(60));
    app.on_tick();

    assert_eq!(app.view().stats.wpm, 55);
    assert_eq!(app.view().best, Some(55));
    assert_eq!(app.view().pulse.map(|p| p.wpm), Some(55));
    assert_eq!(
        app.test.store().get(BEST_WPM_KEY).unwrap(),
        Some("55".to_string())
    );

    // second run: 150 correct chars in a minute = 30 wpm
    app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
    app.test.surface_mut().pulse = None;
    for _ in 0..150 {
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
    }
    clock.advance(Duration::from_secs(60));
    app.on_tick();

    assert_eq!(app.view().stats.wpm, 30);
    assert_eq!(app.view().best, Some(55));
    assert_eq!(app.view().pulse, None);
    assert_eq!(app.test.best(), Some(55));
}

#[test]
fn headless_restart_mid_run_cancels_tick() {
    let clock = ManualClock::new();
    let mode = Mode::Countdown { secs: 1 };
    let mut app = app_for("hello", mode, MemoryStore::new(), &clock);

    app.handle_key(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE));
    assert!(app.test.timer().is_armed());

    app.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
    assert!(!app.test.timer().is_armed());

    // the old countdown would have expired by now
    clock.advance(Duration::from_secs(2));
    app.on_tick();
    assert!(app.test.session().input_enabled());
    assert!(!app.test.session().has_ended());
    assert_eq!(app.test.next_tick_in(), None);
}
