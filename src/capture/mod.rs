//! Capture of a single chapter page into a PDF
//!
//! This module contains:
//! - The browser capability traits ([`BrowsingSession`], [`RenderSurface`])
//! - [`CaptureAdapter`], which turns one (book, chapter) pair into one PDF
//! - The headless Chrome backend in [`chrome`]
//!
//! The adapter knows nothing about sequencing or retries: it loads one page,
//! derives the file name from the page title, renders, and always releases the
//! surface it used.

pub mod chrome;
mod sanitize;

pub use chrome::{ChromeSession, ChromeSurface};
pub use sanitize::{pdf_file_name, sanitize_title};

use crate::config::{ArchiveConfig, Config, RenderConfig};
use crate::{CaptureError, CaptureResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A shared browsing session handing out one disposable surface per page
#[async_trait]
pub trait BrowsingSession: Send + Sync {
    type Surface: RenderSurface;

    /// Opens a fresh surface (a browser tab)
    async fn new_surface(&self) -> CaptureResult<Self::Surface>;
}

/// One loaded view that can be rendered to a paginated document
#[async_trait]
pub trait RenderSurface: Send + Sized {
    /// Loads `url`, returning once the page has settled
    async fn navigate(&mut self, url: &str) -> CaptureResult<()>;

    /// The resolved title of the loaded page
    async fn title(&mut self) -> CaptureResult<String>;

    /// Applies print styling and writes the view as a PDF at `path`
    async fn render_to_file(&mut self, path: &Path, options: &RenderOptions) -> CaptureResult<()>;

    /// Releases the surface
    async fn close(self) -> CaptureResult<()>;
}

/// PDF layout handed to [`RenderSurface::render_to_file`]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub paper_width_in: f64,
    pub paper_height_in: f64,
    /// Applied to all four sides; zero means full bleed
    pub margin_in: f64,
    pub scale: f64,
    pub print_background: bool,
    /// Stylesheet injected before printing
    pub print_css: String,
}

impl RenderOptions {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            paper_width_in: config.paper_width_in,
            paper_height_in: config.paper_height_in,
            margin_in: 0.0,
            scale: config.scale,
            print_background: config.print_background,
            print_css: print_stylesheet(&config.font_family, &config.min_font_size),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

/// Elements holding running text; headings are left out so they keep their
/// own scale
const BODY_TEXT_SELECTORS: &str = "p, li, td, th, dd, dt, blockquote, span, a";

/// Builds the print-only stylesheet
///
/// One font family everywhere, and a floor under body text so small print
/// stays legible on paper. `min_font_size` should be an absolute length.
pub fn print_stylesheet(font_family: &str, min_font_size: &str) -> String {
    format!(
        "@media print {{\n  * {{\n    font-family: {} !important;\n  }}\n  {} {{\n    font-size: max({}, 1em) !important;\n  }}\n}}\n",
        font_family, BODY_TEXT_SELECTORS, min_font_size
    )
}

/// One chapter written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedItem {
    pub unit: String,
    pub item: u32,
    pub title: String,
    pub path: PathBuf,
}

/// Turns (book, chapter) pairs into PDFs under the output root
#[derive(Debug, Clone)]
pub struct CaptureAdapter {
    output_root: PathBuf,
    url_template: String,
    item_suffix: String,
    render: RenderOptions,
}

impl CaptureAdapter {
    pub fn new(archive: &ArchiveConfig, render: &RenderConfig) -> Self {
        Self {
            output_root: archive.output_root.clone(),
            url_template: archive.url_template.clone(),
            item_suffix: archive.item_suffix.clone(),
            render: RenderOptions::from_config(render),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.archive, &config.render)
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Directory holding a book's PDFs
    pub fn unit_dir(&self, unit: &str) -> PathBuf {
        self.output_root.join(unit)
    }

    /// URL prefix for a book's chapters
    pub fn base_url(&self, unit: &str) -> String {
        self.url_template.replace("{unit}", unit)
    }

    /// Full URL of one chapter: base + chapter number + suffix
    pub fn item_url(&self, base_url: &str, item: u32) -> String {
        format!("{}{}{}", base_url, item, self.item_suffix)
    }

    /// Captures one chapter into `output_root/unit/<title>.pdf`
    ///
    /// The surface is closed whether or not the capture succeeded. A failure
    /// to close is logged and does not mask the capture result.
    pub async fn capture_item<S: BrowsingSession>(
        &self,
        session: &S,
        unit: &str,
        base_url: &str,
        item: u32,
    ) -> CaptureResult<CapturedItem> {
        let mut surface = session.new_surface().await?;

        let result = self
            .capture_on_surface(&mut surface, unit, base_url, item)
            .await;

        if let Err(e) = surface.close().await {
            tracing::warn!("Failed to release surface for {} {}: {}", unit, item, e);
        }

        result
    }

    async fn capture_on_surface<R: RenderSurface>(
        &self,
        surface: &mut R,
        unit: &str,
        base_url: &str,
        item: u32,
    ) -> CaptureResult<CapturedItem> {
        let url = self.item_url(base_url, item);
        tracing::debug!("Navigating to {}", url);
        surface.navigate(&url).await?;

        let title = surface.title().await?;
        let file_name = pdf_file_name(&title, unit, item);

        let dir = self.unit_dir(unit);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| CaptureError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        let path = dir.join(&file_name);
        surface.render_to_file(&path, &self.render).await?;

        tracing::info!("Saved {}/{}", unit, file_name);

        Ok(CapturedItem {
            unit: unit.to_string(),
            item,
            title,
            path,
        })
    }
}
