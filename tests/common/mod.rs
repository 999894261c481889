//! Common test utilities: an in-process browser double and a recording pause

#![allow(dead_code)]

use async_trait::async_trait;
use commentary_archiver::capture::{BrowsingSession, RenderOptions, RenderSurface};
use commentary_archiver::catalog::{Catalog, UnitGroup};
use commentary_archiver::config::{ArchiveConfig, RenderConfig};
use commentary_archiver::orchestrator::Pause;
use commentary_archiver::{CaptureAdapter, CaptureError, CaptureResult};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_TEMPLATE: &str = "https://commentary.test/guide/{unit}/{unit}-";

/// Three small books so runs finish instantly
pub const SMALL_GROUP: UnitGroup = UnitGroup {
    name: "Test",
    units: &[("alpha", 2), ("beta", 3), ("gamma", 1)],
};

pub fn small_catalog() -> Catalog {
    Catalog::new(&[SMALL_GROUP]).unwrap()
}

pub fn adapter_for(root: &Path) -> CaptureAdapter {
    let archive = ArchiveConfig {
        output_root: root.to_path_buf(),
        url_template: TEST_TEMPLATE.to_string(),
        ..ArchiveConfig::default()
    };
    CaptureAdapter::new(&archive, &RenderConfig::default())
}

#[derive(Debug, Default)]
struct BrowserLog {
    navigations: Vec<String>,
    opened: usize,
    closed: usize,
    failing_fragments: Vec<String>,
    blank_titles: bool,
}

/// Fake browsing session
///
/// Records every navigation, fails any URL containing a configured fragment,
/// titles pages after their URL, and writes a tiny placeholder instead of a
/// real PDF.
#[derive(Clone, Default)]
pub struct FakeSession {
    log: Arc<Mutex<BrowserLog>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes navigation fail for every URL containing `fragment`
    pub fn failing_on(self, fragment: &str) -> Self {
        self.log
            .lock()
            .unwrap()
            .failing_fragments
            .push(fragment.to_string());
        self
    }

    /// Every page reports an empty title
    pub fn with_blank_titles(self) -> Self {
        self.log.lock().unwrap().blank_titles = true;
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.log.lock().unwrap().navigations.clone()
    }

    pub fn opened(&self) -> usize {
        self.log.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.log.lock().unwrap().closed
    }
}

#[async_trait]
impl BrowsingSession for FakeSession {
    type Surface = FakeSurface;

    async fn new_surface(&self) -> CaptureResult<FakeSurface> {
        self.log.lock().unwrap().opened += 1;
        Ok(FakeSurface {
            log: self.log.clone(),
            url: None,
        })
    }
}

pub struct FakeSurface {
    log: Arc<Mutex<BrowserLog>>,
    url: Option<String>,
}

#[async_trait]
impl RenderSurface for FakeSurface {
    async fn navigate(&mut self, url: &str) -> CaptureResult<()> {
        let mut log = self.log.lock().unwrap();
        log.navigations.push(url.to_string());
        if log.failing_fragments.iter().any(|f| url.contains(f.as_str())) {
            return Err(CaptureError::Navigation {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        self.url = Some(url.to_string());
        Ok(())
    }

    async fn title(&mut self) -> CaptureResult<String> {
        if self.log.lock().unwrap().blank_titles {
            return Ok(String::new());
        }
        let url = self.url.clone().unwrap_or_default();
        let page = url
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .trim_end_matches(".cfm")
            .to_string();
        Ok(format!("Study Guide: {}", page))
    }

    async fn render_to_file(&mut self, path: &Path, _options: &RenderOptions) -> CaptureResult<()> {
        std::fs::write(path, b"%PDF-1.4 placeholder").map_err(|e| CaptureError::Render {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    async fn close(self) -> CaptureResult<()> {
        self.log.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// Pause double that returns immediately and remembers what it was asked for
#[derive(Clone, Default)]
pub struct RecordingPause {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingPause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pause for RecordingPause {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

pub fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
