use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::difficulty::Difficulty;

/// Everything the game loop reacts to
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Wait up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // some platforms also report releases and repeats
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(GameEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(GameEvent::Resize),
                Ok(_) => Ok(()),
                Err(e) => {
                    warn!(error = %e, "terminal event reader stopped");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Event source fed by a channel, for headless runs
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// How long the loop waits for input before producing a Tick
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// One turn of the loop: the event plus the wall time since the last turn
#[derive(Clone, Debug)]
pub struct Step {
    pub event: GameEvent,
    pub elapsed: Duration,
}

/// Advances the game one event or tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    last_step: Instant,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            last_step: Instant::now(),
        }
    }

    /// Blocks up to one tick interval; yields Tick when nothing arrived.
    pub fn step(&mut self) -> Step {
        let event = match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => GameEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => {
                // keep ticking so timers still run out
                std::thread::sleep(self.ticker.interval());
                GameEvent::Tick
            }
        };
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_step);
        self.last_step = now;
        Step { event, elapsed }
    }
}

/// Runs `restore` when dropped, so terminal state set up before the game
/// loop is undone on every way out: normal return, `?` or panic.
pub struct RestoreGuard<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }
}

impl<F: FnOnce()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// What a key press asks the game to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Type(char),
    Backspace,
    /// same text again
    Restart,
    /// fresh text for the current mode
    NextText,
    SetDifficulty(Difficulty),
    Quit,
}

pub fn command_for(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            KeyCode::Char('r') => Some(Command::Restart),
            KeyCode::Char('n') => Some(Command::NextText),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Tab => Some(Command::Restart),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Enter => Some(Command::Type('\n')),
        KeyCode::F(n @ 1..=4) => Some(Command::SetDifficulty(Difficulty::ALL[n as usize - 1])),
        KeyCode::Char(c) => Some(Command::Type(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        match runner.step().event {
            GameEvent::Tick => {}
            other => panic!("expected Tick on timeout, got {other:?}"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let mut runner = Runner::new(es, ticker);

        match runner.step().event {
            GameEvent::Resize => {}
            other => panic!("expected Resize event, got {other:?}"),
        }
    }

    #[test]
    fn step_reports_elapsed_time() {
        let (_tx, rx) = mpsc::channel::<GameEvent>();
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

        let step = runner.step();

        assert!(step.elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn keys_map_to_commands() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(command_for(key(KeyCode::Char('a'))), Some(Command::Type('a')));
        assert_eq!(command_for(key(KeyCode::Backspace)), Some(Command::Backspace));
        assert_eq!(command_for(key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(command_for(key(KeyCode::Tab)), Some(Command::Restart));
        assert_eq!(command_for(key(KeyCode::Enter)), Some(Command::Type('\n')));
        assert_eq!(
            command_for(key(KeyCode::F(4))),
            Some(Command::SetDifficulty(Difficulty::Expert))
        );
        assert_eq!(command_for(key(KeyCode::F(9))), None);
    }

    #[test]
    fn control_chords_are_not_typed() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);

        assert_eq!(command_for(ctrl('c')), Some(Command::Quit));
        assert_eq!(command_for(ctrl('n')), Some(Command::NextText));
        assert_eq!(command_for(ctrl('x')), None);
    }

    #[test]
    fn restore_guard_runs_on_early_return() {
        let restored = Arc::new(AtomicUsize::new(0));

        fn setup(restored: &Arc<AtomicUsize>) -> Result<(), &'static str> {
            let counter = Arc::clone(restored);
            let _guard = RestoreGuard::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            let entered: Result<(), &'static str> = Err("terminal setup failed");
            entered?;
            Ok(())
        }

        assert!(setup(&restored).is_err());
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn restore_guard_runs_on_panic() {
        let restored = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&restored);

        let outcome = std::panic::catch_unwind(move || {
            let _guard = RestoreGuard::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            panic!("game loop blew up");
        });

        assert!(outcome.is_err());
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }
}
