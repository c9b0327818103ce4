use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typerace";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("typerace_config.json"))
    }

    /// Log file location; the terminal is in raw mode so logs never go to stdout
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
                .join("typerace.log")
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|pd| pd.data_local_dir().join("typerace.log"))
                .unwrap_or_else(|| PathBuf::from("typerace.log"))
        }
    }
}
