use thiserror::Error;

/// Failures at the edges of the game (config files and the terminal).
///
/// The session engine and countdown timer never fail: a call that the current
/// state does not allow is ignored rather than reported.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
