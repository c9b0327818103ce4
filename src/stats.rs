use itertools::{EitherOrBoth, Itertools};
use std::time::Duration;

/// Standard convention: five characters make one "word".
pub const CHARS_PER_WORD: f64 = 5.0;

/// Statistics derived from a session snapshot. Never stored; recomputed on
/// every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivedStats {
    pub total_chars: usize,
    pub correct_chars: usize,
    pub accuracy: u32,
    pub time_elapsed_ms: u64,
    pub wpm: u32,
    pub progress: u32,
    pub is_complete: bool,
}

impl DerivedStats {
    /// `elapsed` is `None` while the session has no start time.
    pub fn derive(input: &[char], target: &[char], elapsed: Option<Duration>) -> Self {
        let total_chars = input.len();
        let correct_chars = count_correct_chars(input, target);
        let time_elapsed_ms = elapsed.map_or(0, |d| d.as_millis() as u64);

        Self {
            total_chars,
            correct_chars,
            accuracy: calculate_accuracy(correct_chars, total_chars),
            time_elapsed_ms,
            wpm: calculate_wpm(correct_chars, time_elapsed_ms),
            progress: calculate_progress(total_chars, target.len()),
            is_complete: input == target,
        }
    }
}

/// Status of a single target position, used when painting the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharStatus {
    Correct,
    Incorrect,
    Pending,
}

pub fn count_correct_chars(input: &[char], target: &[char]) -> usize {
    input
        .iter()
        .zip(target.iter())
        .filter(|(typed, expected)| typed == expected)
        .count()
}

pub fn calculate_accuracy(correct_chars: usize, total_chars: usize) -> u32 {
    if total_chars == 0 {
        return 0;
    }
    ((correct_chars as f64 / total_chars as f64) * 100.0).round() as u32
}

pub fn calculate_wpm(correct_chars: usize, time_elapsed_ms: u64) -> u32 {
    let minutes = time_elapsed_ms as f64 / 60_000.0;
    if minutes <= 0.0 {
        return 0;
    }
    ((correct_chars as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

pub fn calculate_progress(current_len: usize, target_len: usize) -> u32 {
    if target_len == 0 {
        return 0;
    }
    ((current_len as f64 / target_len as f64) * 100.0).round() as u32
}

pub fn is_char_correct(input: &[char], target: &[char], index: usize) -> bool {
    matches!((input.get(index), target.get(index)), (Some(a), Some(b)) if a == b)
}

pub fn char_status(input: &[char], target: &[char], index: usize) -> CharStatus {
    if index >= input.len() {
        CharStatus::Pending
    } else if is_char_correct(input, target, index) {
        CharStatus::Correct
    } else {
        CharStatus::Incorrect
    }
}

/// Status for every position of `target`, in order.
pub fn char_statuses(input: &[char], target: &[char]) -> Vec<CharStatus> {
    target
        .iter()
        .zip_longest(input.iter())
        .filter_map(|pair| match pair {
            EitherOrBoth::Both(expected, typed) if expected == typed => Some(CharStatus::Correct),
            EitherOrBoth::Both(_, _) => Some(CharStatus::Incorrect),
            EitherOrBoth::Left(_) => Some(CharStatus::Pending),
            // input never outgrows the target
            EitherOrBoth::Right(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_count_correct_chars() {
        assert_eq!(count_correct_chars(&chars("hxllo"), &chars("hello")), 4);
        assert_eq!(count_correct_chars(&chars(""), &chars("hello")), 0);
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(calculate_accuracy(0, 0), 0);
        assert_eq!(calculate_accuracy(3, 4), 75);
        assert_eq!(calculate_accuracy(2, 3), 67);
        assert_eq!(calculate_accuracy(5, 5), 100);
    }

    #[test]
    fn test_wpm() {
        assert_eq!(calculate_wpm(50, 60_000), 10);
        assert_eq!(calculate_wpm(50, 30_000), 20);
        assert_eq!(calculate_wpm(50, 0), 0);
        assert_eq!(calculate_wpm(0, 60_000), 0);
    }

    #[test]
    fn test_progress() {
        assert_eq!(calculate_progress(0, 0), 0);
        assert_eq!(calculate_progress(5, 11), 45);
        assert_eq!(calculate_progress(11, 11), 100);
    }

    #[test]
    fn test_char_status() {
        let target = chars("abc");
        let input = chars("ax");
        assert_eq!(char_status(&input, &target, 0), CharStatus::Correct);
        assert_eq!(char_status(&input, &target, 1), CharStatus::Incorrect);
        assert_eq!(char_status(&input, &target, 2), CharStatus::Pending);
    }

    #[test]
    fn test_char_statuses_cover_whole_target() {
        let statuses = char_statuses(&chars("hx"), &chars("hey"));
        assert_eq!(
            statuses,
            vec![
                CharStatus::Correct,
                CharStatus::Incorrect,
                CharStatus::Pending
            ]
        );
    }

    #[test]
    fn test_derive_without_start_time() {
        let stats = DerivedStats::derive(&chars("He"), &chars("Hello"), None);
        assert_eq!(stats.total_chars, 2);
        assert_eq!(stats.correct_chars, 2);
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.time_elapsed_ms, 0);
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.progress, 40);
        assert!(!stats.is_complete);
    }

    #[test]
    fn test_derive_empty_target() {
        let stats = DerivedStats::derive(&[], &[], None);
        assert_eq!(stats.progress, 0);
        assert_eq!(stats.accuracy, 0);
        assert!(stats.is_complete);
    }
}
