use std::collections::BTreeSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::bots::{Bot, BotRace, BOTS};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::daily::DailyChallenge;
use crate::difficulty::{Difficulty, GameMode};
use crate::feedback::{Feedback, SilentFeedback};
use crate::lessons::LessonCursor;
use crate::runtime::Command;
use crate::scores::{MemoryScoreStore, RaceHistory, RaceResult, ScoreStore};
use crate::session::{SessionEngine, Status};
use crate::stats::{self, CharStatus, DerivedStats};
use crate::text_source::{TextConfig, TextSource};
use crate::timer::CountdownTimer;
use crate::wpm_tracker::WpmTracker;

/// Messages the countdown leaves for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    TimeUp,
}

#[derive(Debug, Clone, Default)]
pub struct GameSettings {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub custom_prompt: Option<String>,
    /// replaces the countdown length of timed modes
    pub seconds_override: Option<i64>,
    pub sound_enabled: bool,
    /// fixed seed for text picks; random when absent
    pub seed: Option<u64>,
    /// day of the Daily challenge; today when absent
    pub date: Option<NaiveDate>,
    /// 0-based lesson to begin Lesson mode with
    pub lesson: usize,
}

impl From<&Config> for GameSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            mode: cfg.mode,
            difficulty: cfg.difficulty,
            sound_enabled: cfg.sound_enabled,
            ..Self::default()
        }
    }
}

/// Wires one session engine to its countdown and the outside world.
///
/// The timer never touches the session. Its expiry callback posts
/// [`Signal::TimeUp`] and the game applies it on its next turn. Session and
/// timer are always reset together, and signals still queued at that point
/// are dropped so they cannot finish the next round.
pub struct Game<C: Clock = SystemClock> {
    session: SessionEngine<C>,
    timer: Option<CountdownTimer>,
    bots: Option<BotRace>,
    signal_tx: Sender<Signal>,
    signals: Receiver<Signal>,
    tracker: WpmTracker,
    texts: TextSource,
    rng: StdRng,
    seconds_override: Option<i64>,
    sound_enabled: bool,
    feedback: Box<dyn Feedback>,
    scores: Box<dyn ScoreStore>,
    history: RaceHistory,
    last_result: Option<RaceResult>,
    completed_lessons: BTreeSet<&'static str>,
}

impl Game<SystemClock> {
    pub fn new(settings: GameSettings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Game<C> {
    pub fn with_clock(settings: GameSettings, clock: C) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let texts = TextSource::new(TextConfig {
            mode: settings.mode,
            difficulty: settings.difficulty,
            custom_prompt: settings.custom_prompt,
            date: settings.date,
            lesson: LessonCursor::new(settings.lesson),
        });
        let prompt = texts.generate_prompt(&mut rng);
        let (signal_tx, signals) = mpsc::channel();

        let mut game = Self {
            session: SessionEngine::with_clock(&prompt, clock),
            timer: None,
            bots: None,
            signal_tx,
            signals,
            tracker: WpmTracker::new(),
            texts,
            rng,
            seconds_override: settings.seconds_override,
            sound_enabled: settings.sound_enabled,
            feedback: Box::new(SilentFeedback),
            scores: Box::new(MemoryScoreStore::new()),
            history: RaceHistory::default(),
            last_result: None,
            completed_lessons: BTreeSet::new(),
        };
        game.sync_mode();
        game
    }

    pub fn with_feedback(mut self, feedback: Box<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_scores(mut self, scores: Box<dyn ScoreStore>) -> Self {
        self.scores = scores;
        self
    }

    /// Starts the round (and its countdown) if it hasn't started yet.
    pub fn start(&mut self) {
        if !self.session.is_initial() {
            return;
        }
        self.session.start();
        if let Some(timer) = self.timer.as_mut() {
            timer.start();
        }
        info!(mode = %self.mode(), difficulty = %self.difficulty(), "round started");
    }

    /// Replaces the typed text. The first non-empty input that fits the
    /// target starts the round; typing the whole text exactly finishes it.
    /// In Lesson mode a finished exercise moves straight on to the next one
    /// until the lesson's last exercise.
    pub fn handle_input(&mut self, value: &str) {
        let len = value.chars().count();
        if len > self.session.target_chars().len() {
            debug!(len, "input longer than target ignored");
            return;
        }
        if self.session.is_initial() && len > 0 {
            self.start();
        }
        if !self.session.is_playing() {
            return;
        }

        let target = self.session.target_chars();
        if len > self.session.input_chars().len() {
            let expected = target[len - 1];
            let correct = value.chars().last() == Some(expected);
            if self.sound_enabled {
                if correct {
                    self.feedback.correct();
                } else {
                    self.feedback.incorrect();
                }
            }
        }

        self.session.submit_input(value);

        if self.session.is_playing() && self.session.query_stats().is_complete {
            self.finish_round(true);
            if self.mode() == GameMode::Lesson && !self.texts.lesson().is_last_exercise() {
                self.next_text();
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.session.is_finished() {
            return;
        }
        let mut value = self.session.user_input();
        value.push(c);
        self.handle_input(&value);
    }

    pub fn backspace(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        let mut value = self.session.user_input();
        if value.pop().is_some() {
            self.handle_input(&value);
        }
    }

    /// Feeds elapsed wall time to the countdown, then applies whatever the
    /// countdown signalled. While the round is still on, bots move and the
    /// WPM sampler runs.
    pub fn advance(&mut self, dt: Duration) {
        if let Some(timer) = self.timer.as_mut() {
            timer.advance(dt);
        }
        self.process_signals();

        if !self.session.is_playing() {
            return;
        }
        if let Some(bots) = self.bots.as_mut() {
            bots.advance(dt);
            if let Some(bot) = bots.winner() {
                info!(bot = bot.name, "bot finished first");
                self.finish_round(false);
                return;
            }
        }
        let stats = self.session.query_stats();
        self.tracker.advance(
            dt,
            stats.total_chars,
            Duration::from_millis(stats.time_elapsed_ms),
        );
    }

    /// Same text, fresh attempt
    pub fn restart(&mut self) {
        self.reset_round(None);
    }

    /// New text for the current mode and difficulty. In Lesson mode this is
    /// the next exercise.
    pub fn next_text(&mut self) {
        if self.mode() == GameMode::Lesson && self.texts.advance_lesson() {
            debug!(lesson = self.texts.lesson().lesson().id, "moved to next lesson");
        }
        self.fresh_text();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.texts.set_difficulty(difficulty);
        self.fresh_text();
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.texts.set_mode(mode);
        self.fresh_text();
    }

    fn fresh_text(&mut self) {
        let prompt = self.texts.generate_prompt(&mut self.rng);
        self.reset_round(Some(prompt));
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Type(c) => self.type_char(c),
            Command::Backspace => self.backspace(),
            Command::Restart => self.restart(),
            Command::NextText => self.next_text(),
            Command::SetDifficulty(difficulty) => self.set_difficulty(difficulty),
            Command::Quit => {}
        }
    }

    fn process_signals(&mut self) {
        while let Ok(signal) = self.signals.try_recv() {
            match signal {
                Signal::TimeUp => {
                    info!("time is up");
                    self.finish_round(false);
                }
            }
        }
    }

    fn finish_round(&mut self, completed: bool) {
        if !self.session.is_playing() {
            return;
        }
        self.session.finish();
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }

        let stats = self.session.query_stats();
        let mode = self.mode();
        let result = RaceResult {
            mode,
            difficulty: self.difficulty(),
            wpm: stats.wpm,
            accuracy: stats.accuracy,
            max_streak: self.session.max_streak(),
            progress: stats.progress,
            completed,
            goal_met: (mode == GameMode::Daily).then(|| self.texts.daily().goal_met(stats.wpm)),
            won: (mode == GameMode::Bots).then_some(completed),
            finished_at: Local::now(),
        };

        if completed {
            if self.sound_enabled {
                self.feedback.complete();
            }
            if mode.has_difficulty() && self.scores.update_high_score(result.difficulty, result.wpm)
            {
                info!(difficulty = %result.difficulty, wpm = result.wpm, "new high score");
            }
            let cursor = self.texts.lesson();
            if mode == GameMode::Lesson && cursor.is_last_exercise() {
                info!(lesson = cursor.lesson().id, "lesson completed");
                self.completed_lessons.insert(cursor.lesson().id);
            }
        }

        info!(
            wpm = result.wpm,
            accuracy = result.accuracy,
            completed,
            "round finished"
        );
        self.history.push(result.clone());
        self.last_result = Some(result);
    }

    fn reset_round(&mut self, prompt: Option<String>) {
        self.session.reset(prompt.as_deref());
        self.sync_mode();
        let dropped = self.signals.try_iter().count();
        if dropped > 0 {
            debug!(dropped, "discarded stale timer signals");
        }
        self.tracker.clear();
        self.last_result = None;
    }

    fn sync_mode(&mut self) {
        self.sync_timer();
        self.sync_bots();
    }

    /// Makes the countdown match the current mode: configured and stopped
    /// for timed modes, absent otherwise.
    fn sync_timer(&mut self) {
        match self.allowed_seconds() {
            Some(secs) => {
                let tx = self.signal_tx.clone();
                let timer = self.timer.get_or_insert_with(|| expiry_timer(secs, tx));
                timer.configure(secs);
                timer.reset();
            }
            None => self.timer = None,
        }
    }

    /// Bots at the start line in bot races, absent otherwise
    fn sync_bots(&mut self) {
        if self.mode() != GameMode::Bots {
            self.bots = None;
            return;
        }
        let len = self.session.target_chars().len();
        self.bots
            .get_or_insert_with(|| BotRace::new(len, &BOTS))
            .reset(len);
    }

    fn allowed_seconds(&self) -> Option<i64> {
        let secs = match self.mode() {
            GameMode::Daily => Some(self.texts.daily().seconds),
            mode => mode.allowed_seconds(self.difficulty()),
        };
        secs.map(|secs| self.seconds_override.unwrap_or(secs))
    }

    pub fn session(&self) -> &SessionEngine<C> {
        &self.session
    }

    pub fn status(&self) -> Status {
        self.session.status()
    }

    pub fn stats(&self) -> DerivedStats {
        self.session.query_stats()
    }

    pub fn char_statuses(&self) -> Vec<CharStatus> {
        stats::char_statuses(self.session.input_chars(), self.session.target_chars())
    }

    pub fn timer(&self) -> Option<&CountdownTimer> {
        self.timer.as_ref()
    }

    /// `None` for untimed modes
    pub fn seconds_left(&self) -> Option<i64> {
        self.timer.as_ref().map(CountdownTimer::seconds_left)
    }

    pub fn tracker(&self) -> &WpmTracker {
        &self.tracker
    }

    pub fn last_result(&self) -> Option<&RaceResult> {
        self.last_result.as_ref()
    }

    pub fn history(&self) -> &RaceHistory {
        &self.history
    }

    pub fn high_score(&self, difficulty: Difficulty) -> u32 {
        self.scores.high_score(difficulty)
    }

    pub fn mode(&self) -> GameMode {
        self.texts.config().mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.texts.config().difficulty
    }

    /// The Daily challenge for this game's date
    pub fn daily(&self) -> &'static DailyChallenge {
        self.texts.daily()
    }

    pub fn lesson(&self) -> LessonCursor {
        self.texts.lesson()
    }

    pub fn is_lesson_completed(&self, id: &str) -> bool {
        self.completed_lessons.contains(id)
    }

    /// Bots with their progress in percent; empty outside bot races
    pub fn bot_standings(&self) -> Vec<(Bot, u32)> {
        self.bots
            .as_ref()
            .map(|bots| bots.standings().collect())
            .unwrap_or_default()
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }
}

fn expiry_timer(allowed_seconds: i64, tx: Sender<Signal>) -> CountdownTimer {
    CountdownTimer::new(allowed_seconds, move || {
        // the receiver lives as long as the game that owns this timer
        let _ = tx.send(Signal::TimeUp);
    })
}
