//! Configuration module for the archiver
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. A configuration file is optional: `Config::default()` reproduces the
//! reference behavior (output under `pdfs/`, A4 at scale 2.0, two seconds
//! between books).
//!
//! # Example
//!
//! ```no_run
//! use commentary_archiver::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("archiver.toml")).unwrap();
//! println!("Writing PDFs under {}", config.archive.output_root.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ArchiveConfig, BrowserConfig, Config, RenderConfig, DEFAULT_URL_TEMPLATE};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
