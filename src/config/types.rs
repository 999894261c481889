use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default remote location of a book's chapters; `{unit}` is the book name
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://www.blueletterbible.org/comm/guzik_david/study-guide/{unit}/{unit}-";

/// Main configuration structure for the archiver
///
/// Every section and key is optional; omitted values fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub browser: BrowserConfig,
    pub render: RenderConfig,
}

/// Where chapters come from, where PDFs go, and how fast to go
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ArchiveConfig {
    /// Root directory holding one subdirectory per book
    pub output_root: PathBuf,

    /// Chapter URL prefix; `{unit}` is replaced by the book name
    pub url_template: String,

    /// Appended after the chapter number
    pub item_suffix: String,

    /// Pause between books (milliseconds)
    pub delay_ms: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("pdfs"),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            item_suffix: ".cfm".to_string(),
            delay_ms: 2000,
        }
    }
}

impl ArchiveConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Headless browser settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    /// Run Chrome without a window
    pub headless: bool,

    /// Upper bound on a single page load (seconds)
    pub navigation_timeout_secs: u64,

    /// Explicit Chrome/Chromium binary; detected automatically when unset
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            navigation_timeout_secs: 60,
            chrome_executable: None,
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

/// PDF layout and print styling
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    /// Paper width in inches (A4 by default)
    pub paper_width_in: f64,

    /// Paper height in inches
    pub paper_height_in: f64,

    /// Render scale factor
    pub scale: f64,

    /// Include page backgrounds
    pub print_background: bool,

    /// Font family forced on every element when printing
    pub font_family: String,

    /// Smallest font size allowed for body text when printing
    ///
    /// Must be an absolute length (`pt`, `px`, `mm`, `rem`...); `em` and `%`
    /// resolve against the parent and would make the floor a no-op.
    pub min_font_size: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            paper_width_in: 8.27,
            paper_height_in: 11.69,
            scale: 2.0,
            print_background: true,
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            min_font_size: "12pt".to_string(),
        }
    }
}
