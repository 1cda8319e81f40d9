use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "swiftkeys";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("swiftkeys_config.json"))
    }

    /// History database under `$HOME/.local/state`, falling back to the
    /// platform data dir when `HOME` is unset.
    pub fn db_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
                .join("history.db");
        }
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.data_local_dir().join("history.db"))
            .unwrap_or_else(|| PathBuf::from("swiftkeys_history.db"))
    }
}
