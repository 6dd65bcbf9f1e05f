mod config;

pub use config::{Config, HistoryConfig, ReviewConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/yusnote[-dev]/` based on YUSNOTE_ENV.
///
/// Set YUSNOTE_ENV=dev to use development data directory, or
/// YUSNOTE_CONFIG_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("YUSNOTE_CONFIG_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("YUSNOTE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("yusnote-dev")
            } else {
                base_dir.join("yusnote")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
