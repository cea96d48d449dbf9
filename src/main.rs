use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use tracing::{info, warn};

use typetest::{
    app::{App, Flow},
    app_dirs::AppDirs,
    best::FileStore,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    samples::{SampleSource, SAMPLE_TEXTS},
    session::Mode,
    timer::SystemClock,
};

/// Idle redraw interval when no session tick is pending.
const IDLE_TICK_MS: u64 = 100;

/// terminal typing speed tester
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a sample passage against the clock or to the end of the text. Shows live WPM and accuracy and remembers your best score."
)]
pub struct Cli {
    /// built-in sample passage to type (1-based)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u64).range(1..=SAMPLE_TEXTS.len() as u64))]
    sample: Option<u64>,

    /// how the test ends
    #[clap(short = 'm', long, value_enum)]
    mode: Option<ModeArg>,

    /// countdown length in seconds
    #[clap(short = 't', long, value_parser = clap::value_parser!(u64).range(1..))]
    secs: Option<u64>,

    /// custom text to type instead of a built-in sample
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// pick a random built-in sample
    #[clap(short = 'r', long, conflicts_with_all = ["sample", "prompt"])]
    random: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum ModeArg {
    /// stop when the countdown runs out
    Countdown,
    /// stop when the whole text has been typed
    Completion,
}

impl Cli {
    /// Merge command line overrides into the saved preferences.
    fn apply(&self, mut cfg: Config) -> (Config, SampleSource) {
        if let Some(secs) = self.secs {
            cfg.countdown_secs = secs;
            if let Mode::Countdown { .. } = cfg.mode {
                cfg.mode = Mode::Countdown { secs };
            }
        }
        match self.mode {
            Some(ModeArg::Countdown) => {
                cfg.mode = Mode::Countdown {
                    secs: cfg.countdown_secs,
                }
            }
            Some(ModeArg::Completion) => cfg.mode = Mode::Completion,
            None => {}
        }
        if let Some(sample) = self.sample {
            cfg.sample = sample as usize - 1;
        }

        let source = match (&self.prompt, self.random) {
            (Some(prompt), _) if !prompt.is_empty() => SampleSource::Custom(prompt.clone()),
            (_, true) => SampleSource::random(),
            _ => SampleSource::builtin(cfg.sample),
        };
        (cfg, source)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        // logging is best effort
        let _ = logging::init(&path);
    }

    let config_store = FileConfigStore::new();
    let (cfg, source) = cli.apply(config_store.load());
    info!(sample = %source.label(), mode = %cfg.mode, "starting");

    let mut app = App::new(
        source,
        cfg.mode,
        cfg.countdown_secs,
        FileStore::new(),
        SystemClock,
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(e) = config_store.save(&app.config(&cfg)) {
        warn!(error = %e, "could not save preferences");
    }

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<FileStore, SystemClock>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(IDLE_TICK_MS)),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step(app.test.next_tick_in()) {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.handle_key(key) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
