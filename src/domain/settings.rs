//! Application configuration models.
//!
//! Every field has a default so a partial (or missing) config file works.

use std::path::PathBuf;

use serde::Deserialize;

/// Where and how to reach the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct WebDriverConfig {
    /// Base URL of a running WebDriver server (geckodriver, chromedriver).
    #[serde(default = "default_webdriver_url")]
    pub url: String,

    /// Browser name requested when creating the session.
    #[serde(default = "default_browser")]
    pub browser: String,

    /// Page opened once the session starts.
    #[serde(default = "default_chat_url")]
    pub chat_url: String,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            browser: default_browser(),
            chat_url: default_chat_url(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".into()
}

fn default_browser() -> String {
    "firefox".into()
}

fn default_chat_url() -> String {
    "https://web.whatsapp.com/".into()
}

/// Class and attribute names of the chat client's markup.
///
/// The client ships obfuscated class names that change between releases,
/// so they are configurable rather than baked in.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Class carried by every rendered message body.
    #[serde(default = "default_message_class")]
    pub message_class: String,

    /// Attribute holding the `[time, date] sender: ` prefix.
    #[serde(default = "default_metadata_attribute")]
    pub metadata_attribute: String,

    /// Class of the element that receives scroll keys.
    #[serde(default = "default_scroll_container_class")]
    pub scroll_container_class: String,

    /// Class of the contact search box.
    #[serde(default = "default_search_box_class")]
    pub search_box_class: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            message_class: default_message_class(),
            metadata_attribute: default_metadata_attribute(),
            scroll_container_class: default_scroll_container_class(),
            search_box_class: default_search_box_class(),
        }
    }
}

fn default_message_class() -> String {
    "copyable-text".into()
}

fn default_metadata_attribute() -> String {
    "data-pre-plain-text".into()
}

fn default_scroll_container_class() -> String {
    "_26MUt".into()
}

fn default_search_box_class() -> String {
    "_1Ra05".into()
}

/// Traversal limits.
#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    /// Give up scrolling after this many key presses. `None` scrolls forever.
    #[serde(default)]
    pub max_scroll_attempts: Option<u64>,

    /// Seconds to wait before touching the page, giving the user time to
    /// switch back to the browser window.
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_scroll_attempts: None,
            countdown_secs: default_countdown_secs(),
        }
    }
}

const fn default_countdown_secs() -> u64 {
    3
}

/// Export destination.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory that receives `<contact>-chat.<ext>` files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Complete application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub webdriver: WebDriverConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub traversal: TraversalConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".whatsapp-chat-export")
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_file_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }
}
