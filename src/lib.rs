// Library surface for the terminal binary and headless/integration tests.
pub mod app_dirs;
pub mod bots;
pub mod clock;
pub mod config;
pub mod daily;
pub mod difficulty;
pub mod error;
pub mod feedback;
pub mod game;
pub mod lessons;
pub mod runtime;
pub mod scores;
pub mod session;
pub mod stats;
pub mod text_source;
pub mod timer;
pub mod wpm_tracker;

pub use error::{GameError, Result};
