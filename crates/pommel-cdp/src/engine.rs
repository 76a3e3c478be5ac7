//! Launches or attaches to a Chromium over the DevTools protocol.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tracing::{debug, info};

use pommel_core::config::BrowserKind;
use pommel_core::driver::{BrowserEngine, LaunchOptions, PageDriver};
use pommel_core::error::{PommelError, Result};

use crate::finder::BrowserFinder;
use crate::page::CdpPage;

#[derive(Default)]
pub struct CdpEngine;

impl CdpEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserEngine for CdpEngine {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageDriver>> {
        let owned = options.cdp_endpoint.is_none();
        let (browser, mut handler) = match options.cdp_endpoint {
            Some(ref endpoint) => {
                info!("attaching to browser at {endpoint}");
                Browser::connect(endpoint.as_str()).await.map_err(|err| {
                    PommelError::BrowserLaunch(format!("cannot attach to {endpoint}: {err}"))
                })?
            }
            None => {
                if options.browser != BrowserKind::Chromium {
                    return Err(PommelError::BrowserLaunch(format!(
                        "{} cannot be launched over the DevTools protocol; use chromium, or attach a running browser with --cdp-endpoint",
                        options.browser
                    )));
                }
                let executable = BrowserFinder::from_env().find()?;
                debug!("using browser executable {}", executable.display());
                let mut builder = BrowserConfig::builder()
                    .chrome_executable(&executable)
                    .no_sandbox()
                    .window_size(1280, 720)
                    .request_timeout(options.timeout);
                if options.headed {
                    builder = builder.with_head();
                }
                let config = builder.build().map_err(PommelError::BrowserLaunch)?;
                Browser::launch(config)
                    .await
                    .map_err(|err| PommelError::BrowserLaunch(err.to_string()))?
            }
        };

        // The handler pumps protocol messages for as long as the browser
        // lives; it is aborted when the page closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| PommelError::BrowserLaunch(format!("cannot open a page: {err}")))?;

        Ok(Box::new(CdpPage::new(
            browser,
            page,
            owned,
            handler_task,
            options.slow_mo,
        )))
    }
}
