/// A themed set of short exercises, typed in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub keys: &'static str,
    pub exercises: &'static [&'static str],
}

pub const LESSONS: &[Lesson] = &[
    Lesson {
        id: "home-row",
        title: "Home Row Keys",
        description: "Learn the foundation: ASDF JKL;",
        keys: "asdf jkl;",
        exercises: &["asdf", "jkl;", "asdf jkl;", "fjdk", "slaf", "ask dad", "sad lad", "fall flask"],
    },
    Lesson {
        id: "top-row",
        title: "Top Row Keys",
        description: "Master QWERTY UIOP",
        keys: "qwerty uiop",
        exercises: &["qwer", "tyui", "op", "quit", "were", "type", "port", "poetry"],
    },
    Lesson {
        id: "bottom-row",
        title: "Bottom Row Keys",
        description: "Complete with ZXCV BNM",
        keys: "zxcv bnm",
        exercises: &["zxcv", "bnm", "zoom", "box", "van", "can", "man", "banana"],
    },
    Lesson {
        id: "numbers",
        title: "Number Row",
        description: "Type numbers 1-9 and 0",
        keys: "1234567890",
        exercises: &["123", "456", "789", "1234567890", "2024", "99", "100", "500"],
    },
    Lesson {
        id: "punctuation",
        title: "Punctuation",
        description: "Common punctuation marks",
        keys: ".,!?'\"-",
        exercises: &["hello.", "hi!", "why?", "\"quote\"", "it's", "hello, world!"],
    },
    Lesson {
        id: "sentences",
        title: "Full Sentences",
        description: "Put it all together",
        keys: "all",
        exercises: &[
            "The quick brown fox.",
            "Pack my box with jugs.",
            "How are you today?",
            "Type fast, think faster!",
        ],
    },
];

/// Position within the lesson catalogue. Always points at an existing
/// exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LessonCursor {
    lesson: usize,
    exercise: usize,
}

impl LessonCursor {
    /// First exercise of lesson `lesson` (0-based, clamped to the last lesson)
    pub fn new(lesson: usize) -> Self {
        Self {
            lesson: lesson.min(LESSONS.len() - 1),
            exercise: 0,
        }
    }

    pub fn lesson(&self) -> &'static Lesson {
        &LESSONS[self.lesson]
    }

    pub fn lesson_index(&self) -> usize {
        self.lesson
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise
    }

    pub fn exercise(&self) -> &'static str {
        self.lesson().exercises[self.exercise]
    }

    pub fn is_last_exercise(&self) -> bool {
        self.exercise + 1 >= self.lesson().exercises.len()
    }

    /// Moves to the next exercise, or to the start of the next lesson after
    /// the last one (wrapping around the catalogue). Returns true when a
    /// lesson was left.
    pub fn advance(&mut self) -> bool {
        if self.is_last_exercise() {
            self.lesson = (self.lesson + 1) % LESSONS.len();
            self.exercise = 0;
            true
        } else {
            self.exercise += 1;
            false
        }
    }
}
