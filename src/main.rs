mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::{self, OpenOptions},
    io::{self, stdin, Write},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use typerace::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::{Difficulty, GameMode},
    feedback::Feedback,
    game::{Game, GameSettings},
    runtime::{
        command_for, Command, CrosstermEventSource, FixedTicker, GameEvent, RestoreGuard, Runner,
    },
    Result,
};

/// typing races against the clock, right in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type difficulty-scaled paragraphs, quotes or code against a countdown and watch your WPM, accuracy and streak live."
)]
pub struct Cli {
    /// paragraph difficulty; also sets the countdown in classic mode
    #[clap(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// game mode
    #[clap(short, long, value_enum)]
    mode: Option<GameMode>,

    /// custom text to type (implies custom mode unless --mode is given)
    #[clap(short, long)]
    prompt: Option<String>,

    /// override the countdown of timed modes, in seconds
    #[clap(short, long)]
    seconds: Option<i64>,

    /// lesson to start from, 1-based (implies lesson mode unless --mode is given)
    #[clap(short, long)]
    lesson: Option<usize>,

    /// disable sounds
    #[clap(long)]
    mute: bool,

    /// remember difficulty, mode and sound choice for next time
    #[clap(long)]
    save: bool,

    /// config file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Stored config with command line choices layered on top
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            cfg.difficulty = difficulty;
        }
        if let Some(mode) = self.mode {
            cfg.mode = mode;
        }
        if self.mute {
            cfg.sound_enabled = false;
        }
        cfg
    }

    fn settings(&self, cfg: &Config) -> GameSettings {
        let mut settings = GameSettings::from(cfg);
        if let Some(lesson) = self.lesson {
            settings.lesson = lesson.saturating_sub(1);
            if self.mode.is_none() {
                settings.mode = GameMode::Lesson;
            }
        }
        if self.prompt.is_some() && self.mode.is_none() {
            settings.mode = GameMode::Custom;
        }
        settings.custom_prompt = self.prompt.clone();
        settings.seconds_override = self.seconds;
        settings
    }
}

/// Rings the terminal bell on mistakes and when the text is done
struct BellFeedback;

impl BellFeedback {
    fn ring(&self) {
        let mut out = io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!(error = %e, "terminal bell failed");
        }
    }
}

impl Feedback for BellFeedback {
    fn correct(&mut self) {}

    fn incorrect(&mut self) {
        self.ring();
    }

    fn complete(&mut self) {
        self.ring();
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        warn!(error = %e, "failed to leave raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        warn!(error = %e, "failed to leave alternate screen");
    }
}

/// Logs go to a file: the terminal belongs to the game.
fn init_logging() {
    let path = AppDirs::log_path();
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let cfg = cli.apply_to(store.load());
    cfg.validate()?;
    if cli.save {
        store.save(&cfg)?;
        info!(path = %store.path().display(), "saved config");
    }

    let game = Game::new(cli.settings(&cfg)).with_feedback(Box::new(BellFeedback));

    enable_raw_mode()?;
    let _restore = RestoreGuard::new(restore_terminal);
    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    run(&mut terminal, game, cfg.tick_rate_ms)
}

fn run<B: Backend>(terminal: &mut Terminal<B>, mut game: Game, tick_rate_ms: u64) -> Result<()> {
    let ticker = FixedTicker::new(Duration::from_millis(tick_rate_ms));
    let mut runner = Runner::new(CrosstermEventSource::new(), ticker);

    loop {
        terminal.draw(|f| ui::draw(f, &game))?;

        let step = runner.step();
        game.advance(step.elapsed);

        if let GameEvent::Key(key) = step.event {
            match command_for(key) {
                Some(Command::Quit) => break,
                Some(command) => game.apply(command),
                None => {}
            }
        }
    }

    info!(races = game.history().len(), "exiting");
    Ok(())
}
