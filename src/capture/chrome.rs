//! Headless Chrome backend
//!
//! Uses chromiumoxide to drive a single Chrome process for the whole run.
//! Each chapter gets its own tab, which is closed after rendering. The CDP
//! event handler is polled on a background tokio task for as long as the
//! session lives.
//!
//! Navigation is not considered done at the load event: tabs report page
//! lifecycle events, and a navigation finishes when the main frame of the new
//! document reports `networkIdle`.

use crate::capture::{BrowsingSession, RenderOptions, RenderSurface};
use crate::config::BrowserConfig;
use crate::{ArchiveError, CaptureError, CaptureResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeLaunchConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, PrintToPdfParams, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::listeners::EventStream;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A running Chrome process shared by every capture in a run
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromeSession {
    /// Launches Chrome
    ///
    /// # Returns
    ///
    /// * `Ok(ChromeSession)` - Browser is up and its event loop is running
    /// * `Err(ArchiveError::BrowserLaunch)` - Chrome could not be found or started
    pub async fn launch(config: &BrowserConfig) -> Result<Self, ArchiveError> {
        let mut builder = ChromeLaunchConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }
        let launch_config = builder
            .build()
            .map_err(|reason| ArchiveError::BrowserLaunch { reason })?;

        let (browser, mut events) =
            Browser::launch(launch_config)
                .await
                .map_err(|e| ArchiveError::BrowserLaunch {
                    reason: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser event error: {}", e);
                }
            }
        });

        tracing::info!(
            "Browser launched (headless: {}, navigation timeout: {:?})",
            config.headless,
            config.navigation_timeout()
        );

        Ok(Self {
            browser,
            handler,
            navigation_timeout: config.navigation_timeout(),
        })
    }

    /// Shuts Chrome down and waits for its event loop to finish
    pub async fn close(mut self) -> CaptureResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| CaptureError::Session(e.to_string()))?;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for browser exit failed: {}", e);
        }
        if let Err(e) = self.handler.await {
            tracing::debug!("Browser event task ended abnormally: {}", e);
        }
        tracing::info!("Browser closed");
        Ok(())
    }
}

#[async_trait]
impl BrowsingSession for ChromeSession {
    type Surface = ChromeSurface;

    async fn new_surface(&self) -> CaptureResult<ChromeSurface> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| CaptureError::Session(format!("could not open tab: {}", e)))?;

        // Enabled on the blank page so its own lifecycle replay is already
        // behind us when a navigation starts listening
        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .map_err(|e| CaptureError::Session(format!("could not enable lifecycle events: {}", e)))?;

        Ok(ChromeSurface {
            page,
            url: String::new(),
            navigation_timeout: self.navigation_timeout,
        })
    }
}

/// One Chrome tab
pub struct ChromeSurface {
    page: Page,
    url: String,
    navigation_timeout: Duration,
}

#[async_trait]
impl RenderSurface for ChromeSurface {
    async fn navigate(&mut self, url: &str) -> CaptureResult<()> {
        self.url = url.to_string();
        let navigation_err = |reason: String| CaptureError::Navigation {
            url: url.to_string(),
            reason,
        };

        // Subscribe before navigating so no lifecycle event is missed
        let mut lifecycle = self
            .page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(|e| navigation_err(format!("lifecycle events: {}", e)))?;
        let main_frame = self
            .page
            .mainframe()
            .await
            .map_err(|e| navigation_err(format!("main frame: {}", e)))?;
        let mut watch = NetworkIdleWatch::new(main_frame.map(|frame| frame.inner().clone()));

        let settle = goto_until_network_idle(&self.page, url, &mut lifecycle, &mut watch);

        match tokio::time::timeout(self.navigation_timeout, settle).await {
            Ok(result) => result,
            Err(_) => Err(CaptureError::NavigationTimeout {
                url: url.to_string(),
                secs: self.navigation_timeout.as_secs(),
            }),
        }
    }

    async fn title(&mut self) -> CaptureResult<String> {
        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| CaptureError::Title {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;
        Ok(title.unwrap_or_default())
    }

    async fn render_to_file(&mut self, path: &Path, options: &RenderOptions) -> CaptureResult<()> {
        let render_err = |reason: String| CaptureError::Render {
            path: path.to_path_buf(),
            reason,
        };

        let script = style_injection_script(&options.print_css)
            .map_err(|e| render_err(format!("print styles: {}", e)))?;
        self.page
            .evaluate(script.as_str())
            .await
            .map_err(|e| render_err(format!("print styles: {}", e)))?;

        self.page
            .save_pdf(pdf_params(options), path)
            .await
            .map_err(|e| render_err(e.to_string()))?;

        Ok(())
    }

    async fn close(self) -> CaptureResult<()> {
        self.page
            .close()
            .await
            .map_err(|e| CaptureError::Session(format!("could not close tab: {}", e)))
    }
}

async fn goto_until_network_idle(
    page: &Page,
    url: &str,
    lifecycle: &mut EventStream<EventLifecycleEvent>,
    watch: &mut NetworkIdleWatch,
) -> CaptureResult<()> {
    let navigation_err = |reason: String| CaptureError::Navigation {
        url: url.to_string(),
        reason,
    };

    page.goto(url)
        .await
        .map_err(|e| navigation_err(e.to_string()))?;

    while let Some(event) = lifecycle.next().await {
        if watch.observe(event.frame_id.inner(), &event.name) {
            tracing::trace!("Network idle at {}", url);
            return Ok(());
        }
    }

    Err(navigation_err(
        "tab closed before the page went network-idle".to_string(),
    ))
}

fn pdf_params(options: &RenderOptions) -> PrintToPdfParams {
    PrintToPdfParams {
        print_background: Some(options.print_background),
        scale: Some(options.scale),
        paper_width: Some(options.paper_width_in),
        paper_height: Some(options.paper_height_in),
        margin_top: Some(options.margin_in),
        margin_bottom: Some(options.margin_in),
        margin_left: Some(options.margin_in),
        margin_right: Some(options.margin_in),
        ..Default::default()
    }
}

/// JavaScript that appends `css` to the document head as a `<style>` element
fn style_injection_script(css: &str) -> serde_json::Result<String> {
    Ok(format!(
        "(() => {{ const style = document.createElement('style'); style.textContent = {}; document.head.appendChild(style); return true; }})()",
        serde_json::to_string(css)?
    ))
}

/// Follows the lifecycle events of one main-frame navigation
///
/// Events from other frames are ignored. `networkIdle` only counts once the
/// new document has reported `init`, so a late event from the previous
/// document cannot end the wait early.
#[derive(Debug)]
struct NetworkIdleWatch {
    main_frame: Option<String>,
    document_started: bool,
}

impl NetworkIdleWatch {
    fn new(main_frame: Option<String>) -> Self {
        Self {
            main_frame,
            document_started: false,
        }
    }

    /// Feeds one lifecycle event; returns true once the page is network-idle
    fn observe(&mut self, frame_id: &str, name: &str) -> bool {
        if let Some(main) = &self.main_frame {
            if main != frame_id {
                return false;
            }
        }

        match name {
            "init" => {
                self.document_started = true;
                false
            }
            "networkIdle" => self.document_started,
            _ => false,
        }
    }
}
