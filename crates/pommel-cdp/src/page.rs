//! Page driver over a chromiumoxide page.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::warn;

use pommel_core::driver::{ElementDriver, LoadState, PageDriver};
use pommel_core::error::{PommelError, Result};

use crate::element::CdpElement;
use crate::engine_err;

pub struct CdpPage {
    page: Page,
    browser: Mutex<Option<Browser>>,
    /// Whether this process spawned the browser. Attached browsers are left
    /// running on close; only the connection goes away.
    owned: bool,
    handler_task: JoinHandle<()>,
    slow_mo: Duration,
}

impl CdpPage {
    pub(crate) fn new(
        browser: Browser,
        page: Page,
        owned: bool,
        handler_task: JoinHandle<()>,
        slow_mo: Duration,
    ) -> Self {
        Self {
            page,
            browser: Mutex::new(Some(browser)),
            owned,
            handler_task,
            slow_mo,
        }
    }

    async fn pace(&self) {
        if !self.slow_mo.is_zero() {
            sleep(self.slow_mo).await;
        }
    }
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.pace().await;
        self.page
            .goto(url)
            .await
            .map_err(|err| PommelError::Navigation {
                url: url.to_string(),
                source: anyhow::Error::new(err),
            })?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|err| PommelError::Navigation {
                url: url.to_string(),
                source: anyhow::Error::new(err),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let url = self.page.url().await.map_err(engine_err)?;
        Ok(url.unwrap_or_default())
    }

    async fn title(&self) -> Result<String> {
        let title = self.page.get_title().await.map_err(engine_err)?;
        Ok(title.unwrap_or_default())
    }

    async fn load_state(&self) -> Result<Option<LoadState>> {
        let ready_state: String = self
            .page
            .evaluate("document.readyState")
            .await
            .map_err(engine_err)?
            .into_value()
            .map_err(|err| PommelError::Engine(err.to_string()))?;
        Ok(load_state_from_ready_state(&ready_state))
    }

    fn element<'a>(&'a self, selector: &str) -> Box<dyn ElementDriver + 'a> {
        Box::new(CdpElement::new(
            self.page.clone(),
            selector.to_string(),
            None,
            self.slow_mo,
        ))
    }

    fn element_nth<'a>(&'a self, selector: &str, index: usize) -> Box<dyn ElementDriver + 'a> {
        Box::new(CdpElement::new(
            self.page.clone(),
            selector.to_string(),
            Some(index),
            self.slow_mo,
        ))
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        // No matches read as an empty list, not an error.
        let elements = match self.page.find_elements(selector).await {
            Ok(elements) => elements,
            Err(_) => return Ok(Vec::new()),
        };
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element.inner_text().await.map_err(engine_err)?;
            texts.push(text.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        match self.page.find_elements(selector).await {
            Ok(elements) => Ok(elements.len()),
            Err(_) => Ok(0),
        }
    }

    async fn screenshot(&self, path: &Path) -> Result<u64> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        let bytes = self
            .page
            .save_screenshot(params, path)
            .await
            .map_err(|err| PommelError::Screenshot {
                path: path.to_path_buf(),
                source: anyhow::Error::new(err),
            })?;
        Ok(bytes.len() as u64)
    }

    async fn video_path(&self) -> Option<PathBuf> {
        // The DevTools protocol has no page recording; screencasting is a
        // different mechanism and not wired up here.
        None
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self.browser.lock().await;
        if let Some(mut browser) = guard.take() {
            if self.owned {
                if let Err(err) = browser.close().await {
                    warn!("browser close failed: {err}");
                }
                let _ = browser.wait().await;
            }
            // Dropping an attached browser tears down the websocket only.
        }
        self.handler_task.abort();
        Ok(())
    }
}

/// `document.readyState` maps onto our load milestones. The protocol has no
/// separate network-idle signal, so "complete" reads as the furthest one.
fn load_state_from_ready_state(ready_state: &str) -> Option<LoadState> {
    match ready_state {
        "loading" => None,
        "interactive" => Some(LoadState::DomContentLoaded),
        _ => Some(LoadState::NetworkIdle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_state_maps_to_load_milestones() {
        assert_eq!(load_state_from_ready_state("loading"), None);
        assert_eq!(
            load_state_from_ready_state("interactive"),
            Some(LoadState::DomContentLoaded)
        );
        assert_eq!(
            load_state_from_ready_state("complete"),
            Some(LoadState::NetworkIdle)
        );
    }
}
