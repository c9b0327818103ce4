use std::collections::VecDeque;
use std::time::Duration;

use crate::stats::CHARS_PER_WORD;

/// Samples kept: one minute at one sample per second
pub const MAX_SAMPLES: usize = 60;

const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// One live-WPM reading, `t` seconds into the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmPoint {
    pub t: f64,
    pub wpm: u32,
}

impl From<WpmPoint> for (f64, f64) {
    fn from(p: WpmPoint) -> Self {
        (p.t, p.wpm as f64)
    }
}

/// Raw speed: every typed character counts, right or wrong.
pub fn live_wpm(typed_chars: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if typed_chars == 0 || minutes <= 0.0 {
        return 0;
    }
    ((typed_chars as f64 / CHARS_PER_WORD) / minutes).round().max(0.0) as u32
}

/// Rolling history of live WPM while a session is playing
#[derive(Debug, Clone, Default)]
pub struct WpmTracker {
    samples: VecDeque<WpmPoint>,
    current: u32,
    since_sample: Duration,
}

impl WpmTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Banks `dt` and takes one sample per whole second. `typed_chars` and
    /// `elapsed` describe the session at the moment of the call.
    pub fn advance(&mut self, dt: Duration, typed_chars: usize, elapsed: Duration) {
        self.since_sample += dt;
        while self.since_sample >= SAMPLE_INTERVAL {
            self.since_sample -= SAMPLE_INTERVAL;
            self.sample(typed_chars, elapsed);
        }
    }

    pub fn sample(&mut self, typed_chars: usize, elapsed: Duration) {
        self.current = live_wpm(typed_chars, elapsed);
        self.samples.push_back(WpmPoint {
            t: elapsed.as_secs_f64(),
            wpm: self.current,
        });
        while self.samples.len() > MAX_SAMPLES {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.current = 0;
        self.since_sample = Duration::ZERO;
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn history(&self) -> Vec<u32> {
        self.samples.iter().map(|p| p.wpm).collect()
    }

    pub fn points(&self) -> impl Iterator<Item = &WpmPoint> {
        self.samples.iter()
    }

    pub fn peak(&self) -> u32 {
        self.samples.iter().map(|p| p.wpm).max().unwrap_or(0)
    }

    /// Standard deviation of the sampled WPM; lower is steadier.
    pub fn consistency(&self) -> Option<f64> {
        let values: Vec<f64> = self.samples.iter().map(|p| p.wpm as f64).collect();
        std_dev(&values)
    }
}

fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

fn std_dev(data: &[f64]) -> Option<f64> {
    let avg = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = avg - *value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;
    Some(variance.sqrt())
}
