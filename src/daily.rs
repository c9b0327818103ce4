use chrono::{Datelike, Local, NaiveDate};

/// One day's text, countdown and WPM goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyChallenge {
    pub text: &'static str,
    pub seconds: i64,
    pub goal_wpm: u32,
}

pub const CHALLENGES: [DailyChallenge; 7] = [
    DailyChallenge {
        text: "Practice makes perfect. Every keystroke brings you closer to mastery.",
        seconds: 30,
        goal_wpm: 40,
    },
    DailyChallenge {
        text: "The quick brown fox jumps over the lazy dog near the riverbank.",
        seconds: 25,
        goal_wpm: 45,
    },
    DailyChallenge {
        text: "Success is not final, failure is not fatal: courage continues.",
        seconds: 30,
        goal_wpm: 50,
    },
    DailyChallenge {
        text: "Type fast, think faster. Your fingers are extensions of your mind.",
        seconds: 20,
        goal_wpm: 55,
    },
    DailyChallenge {
        text: "Every expert was once a beginner. Keep practicing your typing skills.",
        seconds: 25,
        goal_wpm: 42,
    },
    DailyChallenge {
        text: "Accuracy beats speed. Master precision before pushing your limits.",
        seconds: 30,
        goal_wpm: 38,
    },
    DailyChallenge {
        text: "Challenge yourself daily. Small improvements lead to big results.",
        seconds: 25,
        goal_wpm: 48,
    },
];

impl DailyChallenge {
    /// The challenge for `date`, picked by year + month + day.
    pub fn for_date(date: NaiveDate) -> &'static DailyChallenge {
        let sum = i64::from(date.year()) + i64::from(date.month()) + i64::from(date.day());
        let idx = sum.rem_euclid(CHALLENGES.len() as i64) as usize;
        &CHALLENGES[idx]
    }

    pub fn today() -> &'static DailyChallenge {
        Self::for_date(Local::now().date_naive())
    }

    /// Whether `wpm` reaches the goal. Running out of time still counts.
    pub fn goal_met(&self, wpm: u32) -> bool {
        wpm >= self.goal_wpm
    }
}
