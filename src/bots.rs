use std::time::Duration;

use crate::stats::CHARS_PER_WORD;

/// Opponent typing at a steady speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bot {
    pub name: &'static str,
    pub wpm: u32,
}

pub const BOTS: [Bot; 3] = [
    Bot {
        name: "EasyBot",
        wpm: 25,
    },
    Bot {
        name: "MediumBot",
        wpm: 45,
    },
    Bot {
        name: "HardBot",
        wpm: 70,
    },
];

impl Bot {
    pub fn chars_per_second(&self) -> f64 {
        f64::from(self.wpm) * CHARS_PER_WORD / 60.0
    }
}

#[derive(Debug, Clone)]
struct Runner {
    bot: Bot,
    typed: f64,
}

/// Bots racing the player through a text of `target_len` characters.
/// They only move when fed elapsed time.
#[derive(Debug, Clone)]
pub struct BotRace {
    target_len: usize,
    runners: Vec<Runner>,
}

impl BotRace {
    pub fn new(target_len: usize, bots: &[Bot]) -> Self {
        Self {
            target_len,
            runners: bots.iter().map(|&bot| Runner { bot, typed: 0.0 }).collect(),
        }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        let cap = self.target_len as f64;
        for runner in &mut self.runners {
            runner.typed = (runner.typed + runner.bot.chars_per_second() * elapsed.as_secs_f64()).min(cap);
        }
    }

    /// Back to the start line, for a text of `target_len` characters
    pub fn reset(&mut self, target_len: usize) {
        self.target_len = target_len;
        for runner in &mut self.runners {
            runner.typed = 0.0;
        }
    }

    /// Each bot with its rounded progress in percent
    pub fn standings(&self) -> impl Iterator<Item = (Bot, u32)> + '_ {
        self.runners.iter().map(|r| (r.bot, self.percent(r.typed)))
    }

    /// Fastest bot that reached the end of the text
    pub fn winner(&self) -> Option<Bot> {
        if self.target_len == 0 {
            return None;
        }
        self.runners
            .iter()
            .filter(|r| r.typed >= self.target_len as f64)
            .map(|r| r.bot)
            .max_by_key(|bot| bot.wpm)
    }

    fn percent(&self, typed: f64) -> u32 {
        if self.target_len == 0 {
            return 0;
        }
        (typed / self.target_len as f64 * 100.0).round() as u32
    }
}
