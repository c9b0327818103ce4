use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::daily::DailyChallenge;
use crate::difficulty::{Difficulty, GameMode};
use crate::lessons::LessonCursor;

pub const QUOTES: &[&str] = &[
    "The only way to do great work is to love what you do. - Steve Jobs",
    "Innovation distinguishes between a leader and a follower. - Steve Jobs",
    "Stay hungry, stay foolish. - Steve Jobs",
    "The future belongs to those who believe in the beauty of their dreams. - Eleanor Roosevelt",
    "Success is not final, failure is not fatal: it is the courage to continue that counts. - Winston Churchill",
    "Believe you can and you're halfway there. - Theodore Roosevelt",
    "The only impossible journey is the one you never begin. - Tony Robbins",
    "Life is what happens when you're busy making other plans. - John Lennon",
    "The way to get started is to quit talking and begin doing. - Walt Disney",
    "Don't watch the clock; do what it does. Keep going. - Sam Levenson",
    "In the middle of difficulty lies opportunity. - Albert Einstein",
    "Do what you can, with what you have, where you are. - Theodore Roosevelt",
];

pub const CODE_SNIPPETS: &[&str] = &[
    "fn fibonacci(n: u64) -> u64 {\n    if n <= 1 {\n        return n;\n    }\n    fibonacci(n - 1) + fibonacci(n - 2)\n}",
    "let evens: Vec<u32> = (0..20).filter(|n| n % 2 == 0).collect();",
    "struct Node<T> {\n    value: T,\n    left: Option<Box<Node<T>>>,\n    right: Option<Box<Node<T>>>,\n}",
    "match stream.next().await {\n    Some(Ok(msg)) => handle(msg),\n    Some(Err(e)) => eprintln!(\"error: {e}\"),\n    None => break,\n}",
    "impl Default for Config {\n    fn default() -> Self {\n        Self { retries: 3, verbose: false }\n    }\n}",
    "let counts = words.iter().fold(HashMap::new(), |mut map, w| {\n    *map.entry(w).or_insert(0) += 1;\n    map\n});",
];

pub const MARATHON_TEXTS: &[&str] = &[
    "In the realm of software development, understanding fundamental concepts is crucial for building robust applications. Programming paradigms such as object-oriented programming, functional programming, and procedural programming each offer unique approaches to solving problems. Object-oriented programming emphasizes encapsulation, inheritance, and polymorphism, allowing developers to create modular and reusable code. Functional programming, on the other hand, treats computation as the evaluation of mathematical functions and avoids changing state and mutable data. Meanwhile, procedural programming focuses on a sequence of computational steps to be carried out, making it straightforward and easy to understand for beginners.",
    "The history of computing is a fascinating journey through human innovation and ingenuity. From the earliest mechanical calculators to today's quantum computers, each advancement has built upon the discoveries of previous generations. Charles Babbage's Analytical Engine, though never completed, laid the groundwork for modern computing concepts. Ada Lovelace, often considered the first computer programmer, recognized that machines could go beyond pure calculation. The invention of the transistor revolutionized electronics, making computers smaller, faster, and more reliable.",
];

/// What text to hand out for a round
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub custom_prompt: Option<String>,
    /// day of the Daily challenge; today when absent
    pub date: Option<NaiveDate>,
    pub lesson: LessonCursor,
}

/// Picks the target text for a round
#[derive(Debug, Clone)]
pub struct TextSource {
    config: TextConfig,
}

impl TextSource {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.config.mode = mode;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
    }

    pub fn daily(&self) -> &'static DailyChallenge {
        match self.config.date {
            Some(date) => DailyChallenge::for_date(date),
            None => DailyChallenge::today(),
        }
    }

    pub fn lesson(&self) -> LessonCursor {
        self.config.lesson
    }

    /// Moves to the next lesson exercise. Returns true when a lesson was left.
    pub fn advance_lesson(&mut self) -> bool {
        self.config.lesson.advance()
    }

    /// Text for the configured mode. A custom prompt wins whenever one was
    /// given; Custom mode without one falls back to the difficulty paragraph.
    pub fn generate_prompt<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        if let Some(custom) = self.custom_prompt() {
            return custom.to_string();
        }

        let paragraph = self.config.difficulty.paragraph();
        let picked = match self.config.mode {
            GameMode::Classic
            | GameMode::Zen
            | GameMode::Rush
            | GameMode::Bots
            | GameMode::Custom => paragraph,
            GameMode::Marathon => MARATHON_TEXTS.choose(rng).copied().unwrap_or(paragraph),
            GameMode::Quote => QUOTES.choose(rng).copied().unwrap_or(paragraph),
            GameMode::Code => CODE_SNIPPETS.choose(rng).copied().unwrap_or(paragraph),
            GameMode::Daily => self.daily().text,
            GameMode::Lesson => self.config.lesson.exercise(),
        };
        picked.to_string()
    }

    fn custom_prompt(&self) -> Option<&str> {
        self.config
            .custom_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source(mode: GameMode, difficulty: Difficulty, custom: Option<&str>) -> TextSource {
        TextSource::new(TextConfig {
            mode,
            difficulty,
            custom_prompt: custom.map(str::to_string),
            ..TextConfig::default()
        })
    }

    #[test]
    fn test_classic_uses_difficulty_paragraph() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = source(GameMode::Classic, Difficulty::Hard, None).generate_prompt(&mut rng);
        assert_eq!(text, Difficulty::Hard.paragraph());
    }

    #[test]
    fn test_quote_and_code_come_from_their_pools() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let quote = source(GameMode::Quote, Difficulty::Easy, None).generate_prompt(&mut rng);
            assert!(QUOTES.contains(&quote.as_str()));
            let code = source(GameMode::Code, Difficulty::Easy, None).generate_prompt(&mut rng);
            assert!(CODE_SNIPPETS.contains(&code.as_str()));
        }
    }

    #[test]
    fn test_marathon_uses_long_text() {
        let mut rng = StdRng::seed_from_u64(1);
        let text = source(GameMode::Marathon, Difficulty::Easy, None).generate_prompt(&mut rng);
        assert!(MARATHON_TEXTS.contains(&text.as_str()));
    }

    #[test]
    fn test_custom_prompt_is_used_verbatim() {
        let mut rng = StdRng::seed_from_u64(3);
        let text =
            source(GameMode::Custom, Difficulty::Easy, Some("my own text")).generate_prompt(&mut rng);
        assert_eq!(text, "my own text");
    }

    #[test]
    fn test_blank_custom_prompt_falls_back() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = source(GameMode::Custom, Difficulty::Easy, Some("  ")).generate_prompt(&mut rng);
        assert_eq!(text, Difficulty::Easy.paragraph());
    }

    #[test]
    fn test_daily_text_follows_date() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut texts = source(GameMode::Daily, Difficulty::Easy, None);
        texts.config.date = NaiveDate::from_ymd_opt(2026, 10, 16);

        let text = texts.generate_prompt(&mut rng);

        assert_eq!(text, crate::daily::CHALLENGES[1].text);
        assert_eq!(texts.daily().seconds, 25);
    }

    #[test]
    fn test_lesson_text_follows_cursor() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut texts = source(GameMode::Lesson, Difficulty::Easy, None);
        assert_eq!(texts.generate_prompt(&mut rng), "asdf");

        assert!(!texts.advance_lesson());

        assert_eq!(texts.generate_prompt(&mut rng), "jkl;");
        assert_eq!(texts.lesson().exercise_index(), 1);
    }
}
