use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::difficulty::{Difficulty, GameMode};

/// Results kept in the in-memory history
pub const HISTORY_LIMIT: usize = 50;

/// Outcome of one finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub wpm: u32,
    pub accuracy: u32,
    pub max_streak: usize,
    pub progress: u32,
    /// true when the text was typed out, false when time ran out
    pub completed: bool,
    /// Daily rounds: whether the day's WPM goal was reached
    #[serde(default)]
    pub goal_met: Option<bool>,
    /// Bot races: whether the player finished before every bot
    #[serde(default)]
    pub won: Option<bool>,
    pub finished_at: DateTime<Local>,
}

/// Best WPM per difficulty. Lookups for unknown keys return 0.
pub trait ScoreStore {
    fn high_score(&self, difficulty: Difficulty) -> u32;
    fn set_high_score(&mut self, difficulty: Difficulty, wpm: u32);

    /// Stores `wpm` only if it beats the current best. Returns whether it did.
    fn update_high_score(&mut self, difficulty: Difficulty, wpm: u32) -> bool {
        if wpm > self.high_score(difficulty) {
            self.set_high_score(difficulty, wpm);
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: HashMap<Difficulty, u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn high_score(&self, difficulty: Difficulty) -> u32 {
        self.scores.get(&difficulty).copied().unwrap_or(0)
    }

    fn set_high_score(&mut self, difficulty: Difficulty, wpm: u32) {
        self.scores.insert(difficulty, wpm);
    }
}

/// Most recent results, newest last
#[derive(Debug, Clone, Default)]
pub struct RaceHistory {
    results: VecDeque<RaceResult>,
}

impl RaceHistory {
    pub fn push(&mut self, result: RaceResult) {
        self.results.push_back(result);
        while self.results.len() > HISTORY_LIMIT {
            self.results.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn latest(&self) -> Option<&RaceResult> {
        self.results.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RaceResult> {
        self.results.iter()
    }

    pub fn completed_count(&self) -> usize {
        self.results.iter().filter(|r| r.completed).count()
    }

    pub fn average_wpm(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let total: u32 = self.results.iter().map(|r| r.wpm).sum();
        Some(total as f64 / self.results.len() as f64)
    }
}
