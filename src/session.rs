use std::time::Instant;

use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::stats::DerivedStats;

/// Lifecycle of one typing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Initial,
    Playing,
    Finished,
}

/// Everything the engine transitions over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start { at: Instant },
    Input(Vec<char>),
    Finish,
    Reset { target: Option<Vec<char>> },
}

/// Raw state of one attempt. Statistics are derived from it on demand.
///
/// Invariants: `user_input.len() <= target_text.len()`, `max_streak >= streak`,
/// and nothing but `Reset` changes a `Finished` state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: Status,
    pub user_input: Vec<char>,
    pub target_text: Vec<char>,
    pub start_time: Option<Instant>,
    pub streak: usize,
    pub max_streak: usize,
}

impl SessionState {
    pub fn new(target_text: &str) -> Self {
        Self::with_target(target_text.chars().collect())
    }

    fn with_target(target_text: Vec<char>) -> Self {
        Self {
            status: Status::Initial,
            user_input: Vec::new(),
            target_text,
            start_time: None,
            streak: 0,
            max_streak: 0,
        }
    }

    /// Applies `action` if the current status allows it. Returns whether the
    /// state changed; a rejected action leaves the state untouched.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Start { at } => {
                if self.status != Status::Initial {
                    return false;
                }
                self.status = Status::Playing;
                self.start_time = Some(at);
                true
            }
            Action::Input(value) => {
                if self.status != Status::Playing || value.len() > self.target_text.len() {
                    return false;
                }
                // only forward typing is scored; deletions leave the streak alone
                if value.len() > self.user_input.len() {
                    let last = value.len() - 1;
                    if value[last] == self.target_text[last] {
                        self.streak += 1;
                    } else {
                        self.streak = 0;
                    }
                    self.max_streak = self.max_streak.max(self.streak);
                }
                self.user_input = value;
                true
            }
            Action::Finish => match self.status {
                Status::Playing => {
                    self.status = Status::Finished;
                    true
                }
                Status::Initial | Status::Finished => false,
            },
            Action::Reset { target } => {
                let target = target.unwrap_or_else(|| std::mem::take(&mut self.target_text));
                *self = Self::with_target(target);
                true
            }
        }
    }
}

/// Owns the state of one typing attempt and the clock that anchors its timing.
///
/// Calls that the current status does not allow are ignored. The engine never
/// finishes itself: callers watch [`DerivedStats::is_complete`] after each
/// input and call [`SessionEngine::finish`] when they are ready.
#[derive(Debug)]
pub struct SessionEngine<C: Clock = SystemClock> {
    state: SessionState,
    clock: C,
}

impl SessionEngine<SystemClock> {
    pub fn new(target_text: &str) -> Self {
        Self::with_clock(target_text, SystemClock)
    }
}

impl<C: Clock> SessionEngine<C> {
    pub fn with_clock(target_text: &str, clock: C) -> Self {
        Self {
            state: SessionState::new(target_text),
            clock,
        }
    }

    pub fn start(&mut self) {
        let at = self.clock.now();
        if self.state.apply(Action::Start { at }) {
            debug!(target_len = self.state.target_text.len(), "session started");
        } else {
            debug!(status = ?self.state.status, "ignored start");
        }
    }

    pub fn submit_input(&mut self, value: &str) {
        let value: Vec<char> = value.chars().collect();
        let len = value.len();
        if self.state.apply(Action::Input(value)) {
            trace!(
                len,
                streak = self.state.streak,
                max_streak = self.state.max_streak,
                "input accepted"
            );
        } else {
            debug!(status = ?self.state.status, len, "ignored input");
        }
    }

    pub fn finish(&mut self) {
        if self.state.apply(Action::Finish) {
            debug!(
                typed = self.state.user_input.len(),
                max_streak = self.state.max_streak,
                "session finished"
            );
        }
    }

    /// Back to `Initial`. `target_text` replaces the text to type; `None`
    /// keeps the current one.
    pub fn reset(&mut self, target_text: Option<&str>) {
        let target = target_text.map(|t| t.chars().collect());
        self.state.apply(Action::Reset { target });
        debug!(target_len = self.state.target_text.len(), "session reset");
    }

    pub fn query_stats(&self) -> DerivedStats {
        let elapsed = self
            .state
            .start_time
            .map(|started| self.clock.now().saturating_duration_since(started));
        DerivedStats::derive(&self.state.user_input, &self.state.target_text, elapsed)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn is_initial(&self) -> bool {
        self.state.status == Status::Initial
    }

    pub fn is_playing(&self) -> bool {
        self.state.status == Status::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.state.status == Status::Finished
    }

    pub fn user_input(&self) -> String {
        self.state.user_input.iter().collect()
    }

    pub fn input_chars(&self) -> &[char] {
        &self.state.user_input
    }

    pub fn target_text(&self) -> String {
        self.state.target_text.iter().collect()
    }

    pub fn target_chars(&self) -> &[char] {
        &self.state.target_text
    }

    pub fn streak(&self) -> usize {
        self.state.streak
    }

    pub fn max_streak(&self) -> usize {
        self.state.max_streak
    }
}
