//! Commentary Archiver: a polite chapter-by-chapter PDF archiver
//!
//! This crate captures one remote page per chapter of a multi-book collection
//! as a PDF, laid out as `output-root/<book>/<page title>.pdf`. Progress is
//! never stored separately: a book whose directory exists is treated as done,
//! so an interrupted run is resumed simply by running again.

pub mod capture;
pub mod catalog;
pub mod config;
pub mod orchestrator;
pub mod report;
pub mod resume;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archiver operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Failed to launch browser: {reason}")]
    BrowserLaunch { reason: String },

    #[error("Cannot prepare output root {}: {source}", path.display())]
    OutputRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Catalog lookup and range errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown book '{name}'. Please use a valid book name.")]
    UnknownUnit { name: String },

    #[error("Invalid chapter '{raw}' for {unit}. Please specify a number between 1 and {max}.")]
    InvalidItemIndex { unit: String, raw: String, max: u32 },

    #[error("Invalid catalog table: {0}")]
    InvalidTable(String),
}

/// Errors raised while capturing a single chapter
///
/// Every variant is a capture failure; the display text is the reason shown
/// to the user.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("browser session error: {0}")]
    Session(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} did not settle within {secs}s")]
    NavigationTimeout { url: String, secs: u64 },

    #[error("could not read page title at {url}: {reason}")]
    Title { url: String, reason: String },

    #[error("could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not render {}: {reason}", path.display())]
    Render { path: PathBuf, reason: String },
}

/// Result type alias for archiver operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for capture operations
pub type CaptureResult<T> = std::result::Result<T, CaptureError>;

// Re-export commonly used types
pub use capture::{BrowsingSession, CaptureAdapter, CapturedItem, RenderOptions, RenderSurface};
pub use catalog::{Catalog, CollectionUnit, ItemRange};
pub use config::Config;
pub use orchestrator::{Orchestrator, Pause, TokioPause};
pub use resume::{materialized_units, pending_units, OutputSnapshot};
pub use state::{RunProgress, RunState};
