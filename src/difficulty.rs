use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Paragraph difficulty. Also decides the countdown for timed modes that
/// don't fix their own duration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn allowed_seconds(&self) -> i64 {
        match self {
            Difficulty::Easy => 45,
            Difficulty::Medium => 60,
            Difficulty::Hard => 75,
            Difficulty::Expert => 90,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Perfect for beginners",
            Difficulty::Medium => "Standard challenge",
            Difficulty::Hard => "For experienced typists",
            Difficulty::Expert => "Ultimate challenge",
        }
    }

    pub fn paragraph(&self) -> &'static str {
        match self {
            Difficulty::Easy => "The cat sat on the mat. The dog ran in the park. Birds fly in the sky. Fish swim in the sea. The sun is bright today.",
            Difficulty::Medium => "The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs. How vexingly quick daft zebras jump!",
            Difficulty::Hard => "A quick brown lazy fox has jumped over ten hens and catched the eleventh duck then it ran in to the forest where lion lives and discussed with lion about the event that is going to happen over the next 3 days in the jungle.",
            Difficulty::Expert => "Sphinx of black quartz, judge my vow. The five boxing wizards jump quickly while juggling flaming torches. Cwm fjord bank glyphs vext quiz. Jackdaws love my big sphinx of quartz and complex spectrograms.",
        }
    }
}

/// Ways to play. Modes without a countdown run until the text is typed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
pub enum GameMode {
    /// race the clock on a difficulty-based paragraph
    #[default]
    Classic,
    /// no time pressure
    Zen,
    /// 30 seconds only
    Rush,
    /// long-form endurance, 3 minutes
    Marathon,
    /// famous quotes and sayings
    Quote,
    /// code snippets
    Code,
    /// your own text
    Custom,
    /// one text per day with its own countdown and WPM goal
    Daily,
    /// race bots typing at fixed speeds
    Bots,
    /// short exercises, one lesson at a time
    Lesson,
}

impl GameMode {
    pub fn has_timer(&self) -> bool {
        matches!(
            self,
            GameMode::Classic | GameMode::Rush | GameMode::Marathon | GameMode::Daily
        )
    }

    /// Whether the paragraph (and high score table) follows the difficulty
    pub fn has_difficulty(&self) -> bool {
        matches!(
            self,
            GameMode::Classic | GameMode::Zen | GameMode::Rush | GameMode::Bots
        )
    }

    pub fn fixed_seconds(&self) -> Option<i64> {
        match self {
            GameMode::Rush => Some(30),
            GameMode::Marathon => Some(180),
            _ => None,
        }
    }

    /// Countdown for this mode at `difficulty`. `None` when untimed, and for
    /// Daily, whose countdown comes with the day's challenge.
    pub fn allowed_seconds(&self, difficulty: Difficulty) -> Option<i64> {
        if !self.has_timer() || *self == GameMode::Daily {
            return None;
        }
        Some(
            self.fixed_seconds()
                .unwrap_or_else(|| difficulty.allowed_seconds()),
        )
    }
}
