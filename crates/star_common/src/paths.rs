//! Filesystem locations for STAR Journal files.
//!
//! XDG base directories with `$HOME` fallbacks. Every location can be
//! overridden for tests by pointing the relevant component at an explicit
//! path instead.

use std::path::PathBuf;

const APP_DIR: &str = "star-journal";

/// Data directory holding the question pools and the answer cache:
/// `$XDG_DATA_HOME/star-journal` or `~/.local/share/star-journal`.
pub fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local").join("share")
        })
        .join(APP_DIR)
}

/// Session state file: `$XDG_STATE_HOME/star-journal/session.json` or
/// `~/.local/state/star-journal/session.json`.
pub fn session_state_path() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local").join("state")
        })
        .join(APP_DIR)
        .join("session.json")
}

/// User config file: `$XDG_CONFIG_HOME/star-journal/config.toml` or
/// `~/.config/star-journal/config.toml`.
pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        })
        .join(APP_DIR)
        .join("config.toml")
}
