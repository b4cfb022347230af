//! Configuration file management.
//!
//! Handles loading the TOML configuration file and writing the default one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# WhatsApp Chat Export Configuration
# Auto-generated - edit as needed

[webdriver]
# Running WebDriver server (start geckodriver or chromedriver first)
url = "http://localhost:4444"
browser = "firefox"
chat_url = "https://web.whatsapp.com/"

[selectors]
# Class names of the chat client's markup; update when the client changes
message_class = "copyable-text"
metadata_attribute = "data-pre-plain-text"
scroll_container_class = "_26MUt"
search_box_class = "_1Ra05"

[traversal]
# Stop scrolling back after this many key presses (unset = never give up)
# max_scroll_attempts = 5000

# Seconds to switch back to the browser before extraction starts
countdown_secs = 3

[export]
# Directory that receives <contact>-chat.<ext>
output_dir = "."
"#;

/// Load configuration from file or fall back to defaults.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let config_path = config_file_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Create default configuration file if it doesn't exist.
///
/// Returns the path of the configuration file.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists() -> Result<PathBuf> {
    let config_path = config_file_path();

    if !config_path.exists() {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create config directory", e))?;
        }

        fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| AppError::io("Failed to create default config", e))?;

        tracing::info!(path = %config_path.display(), "Created default configuration");
    }

    Ok(config_path)
}

/// Get the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    AppConfig::config_file_path()
}
