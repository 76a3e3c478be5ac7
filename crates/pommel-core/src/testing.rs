//! Scripted in-memory engine for tests.
//!
//! [`FakePage`] answers the [`PageDriver`] trait from configured state and
//! records every action it is asked to perform. [`FakeEngine`] hands out
//! clones of one shared page, so a test can script the page before a session
//! launches it and inspect the recording afterwards. Timed behavior
//! ([`FakePage::show_after`], [`FakePage::set_url_after`]) uses the tokio
//! clock and composes with paused-time tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::driver::{BrowserEngine, ElementDriver, LaunchOptions, LoadState, PageDriver};
use crate::error::{PommelError, Result};

/// Everything the fake knows, shared by all clones of a page.
#[derive(Default)]
struct PageState {
    url: Mutex<String>,
    title: Mutex<String>,
    load_state: Mutex<Option<LoadState>>,
    text: Mutex<HashMap<String, String>>,
    texts: Mutex<HashMap<String, Vec<String>>>,
    count: Mutex<HashMap<String, usize>>,
    attrs: Mutex<HashMap<(String, String), String>>,
    visible: Mutex<HashMap<String, bool>>,
    enabled: Mutex<HashMap<String, bool>>,
    visible_at: Mutex<HashMap<String, Instant>>,
    url_at: Mutex<Option<(Instant, String)>>,
    click_navigations: Mutex<HashMap<String, String>>,
    screenshot_failure: Mutex<Option<String>>,
    actions: Mutex<Vec<RecordedAction>>,
    closed: Mutex<bool>,
}

/// One action the page was asked to perform, in call order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedAction {
    Goto(String),
    Click(String),
    ClickNth { selector: String, index: usize },
    Fill { selector: String, text: String },
    SelectOption { selector: String, value: String },
    SetChecked { selector: String, checked: bool },
    Hover(String),
    Press { selector: String, key: String },
    Screenshot { path: PathBuf },
    Close,
}

#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<PageState>,
}

impl FakePage {
    pub fn new() -> Self {
        let page = Self::default();
        *page.state.load_state.lock().unwrap() = Some(LoadState::NetworkIdle);
        page
    }

    pub fn set_url(&self, url: &str) {
        *self.state.url.lock().unwrap() = url.to_string();
    }

    pub fn set_title(&self, title: &str) {
        *self.state.title.lock().unwrap() = title.to_string();
    }

    pub fn set_load_state(&self, state: Option<LoadState>) {
        *self.state.load_state.lock().unwrap() = state;
    }

    /// Script the text of `selector`, implying the element exists.
    pub fn set_text(&self, selector: &str, text: &str) {
        self.state
            .text
            .lock()
            .unwrap()
            .insert(selector.to_string(), text.to_string());
        self.ensure_exists(selector);
    }

    /// Script the matched texts of `selector`, setting its count to match.
    pub fn set_texts(&self, selector: &str, texts: &[&str]) {
        self.state
            .count
            .lock()
            .unwrap()
            .insert(selector.to_string(), texts.len());
        self.state.texts.lock().unwrap().insert(
            selector.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
    }

    pub fn set_count(&self, selector: &str, count: usize) {
        self.state
            .count
            .lock()
            .unwrap()
            .insert(selector.to_string(), count);
    }

    pub fn set_attribute(&self, selector: &str, name: &str, value: &str) {
        self.state
            .attrs
            .lock()
            .unwrap()
            .insert((selector.to_string(), name.to_string()), value.to_string());
        self.ensure_exists(selector);
    }

    pub fn show(&self, selector: &str) {
        self.state
            .visible
            .lock()
            .unwrap()
            .insert(selector.to_string(), true);
        self.ensure_exists(selector);
    }

    pub fn hide(&self, selector: &str) {
        self.state
            .visible
            .lock()
            .unwrap()
            .insert(selector.to_string(), false);
    }

    /// Element becomes visible once `delay` has elapsed on the tokio clock.
    pub fn show_after(&self, selector: &str, delay: Duration) {
        self.state
            .visible_at
            .lock()
            .unwrap()
            .insert(selector.to_string(), Instant::now() + delay);
        self.ensure_exists(selector);
    }

    pub fn set_enabled(&self, selector: &str, enabled: bool) {
        self.state
            .enabled
            .lock()
            .unwrap()
            .insert(selector.to_string(), enabled);
        self.ensure_exists(selector);
    }

    /// Page URL flips to `url` once `delay` has elapsed on the tokio clock.
    pub fn set_url_after(&self, delay: Duration, url: &str) {
        *self.state.url_at.lock().unwrap() = Some((Instant::now() + delay, url.to_string()));
    }

    /// Clicking `selector` navigates the page to `url`.
    pub fn on_click_navigate(&self, selector: &str, url: &str) {
        self.state
            .click_navigations
            .lock()
            .unwrap()
            .insert(selector.to_string(), url.to_string());
    }

    /// Next screenshot call fails with `reason`.
    pub fn fail_screenshot(&self, reason: &str) {
        *self.state.screenshot_failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn actions(&self) -> Vec<RecordedAction> {
        self.state.actions.lock().unwrap().clone()
    }

    /// Paths of the screenshots taken so far.
    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.actions()
            .into_iter()
            .filter_map(|action| match action {
                RecordedAction::Screenshot { path } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        *self.state.closed.lock().unwrap()
    }

    fn ensure_exists(&self, selector: &str) {
        self.state
            .count
            .lock()
            .unwrap()
            .entry(selector.to_string())
            .or_insert(1);
    }

    fn record(&self, action: RecordedAction) {
        self.state.actions.lock().unwrap().push(action);
    }

    fn exists(&self, selector: &str) -> bool {
        self.state
            .count
            .lock()
            .unwrap()
            .get(selector)
            .copied()
            .unwrap_or(0)
            > 0
    }

    fn visible(&self, selector: &str) -> bool {
        if let Some(at) = self.state.visible_at.lock().unwrap().get(selector) {
            return Instant::now() >= *at;
        }
        if let Some(flag) = self.state.visible.lock().unwrap().get(selector) {
            return *flag;
        }
        self.exists(selector)
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.record(RecordedAction::Goto(url.to_string()));
        self.set_url(url);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let pending = self.state.url_at.lock().unwrap().clone();
        if let Some((at, url)) = pending {
            if Instant::now() >= at {
                *self.state.url_at.lock().unwrap() = None;
                self.set_url(&url);
            }
        }
        Ok(self.state.url.lock().unwrap().clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.state.title.lock().unwrap().clone())
    }

    async fn load_state(&self) -> Result<Option<LoadState>> {
        Ok(*self.state.load_state.lock().unwrap())
    }

    fn element<'a>(&'a self, selector: &str) -> Box<dyn ElementDriver + 'a> {
        Box::new(FakeElement {
            page: self.clone(),
            selector: selector.to_string(),
            index: None,
        })
    }

    fn element_nth<'a>(&'a self, selector: &str, index: usize) -> Box<dyn ElementDriver + 'a> {
        Box::new(FakeElement {
            page: self.clone(),
            selector: selector.to_string(),
            index: Some(index),
        })
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .texts
            .lock()
            .unwrap()
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self
            .state
            .count
            .lock()
            .unwrap()
            .get(selector)
            .copied()
            .unwrap_or(0))
    }

    async fn screenshot(&self, path: &Path) -> Result<u64> {
        if let Some(reason) = self.state.screenshot_failure.lock().unwrap().take() {
            return Err(PommelError::Screenshot {
                path: path.to_path_buf(),
                source: anyhow::anyhow!(reason),
            });
        }
        let bytes = vec![0x89, 0x50, 0x4E, 0x47];
        std::fs::write(path, &bytes).map_err(|source| PommelError::Screenshot {
            path: path.to_path_buf(),
            source: source.into(),
        })?;
        self.record(RecordedAction::Screenshot {
            path: path.to_path_buf(),
        });
        Ok(bytes.len() as u64)
    }

    async fn video_path(&self) -> Option<PathBuf> {
        None
    }

    async fn close(&self) -> Result<()> {
        self.record(RecordedAction::Close);
        *self.state.closed.lock().unwrap() = true;
        Ok(())
    }
}

struct FakeElement {
    page: FakePage,
    selector: String,
    /// `Some` when this handle addresses one match of a many-element
    /// selector; bounds-checked against the scripted count.
    index: Option<usize>,
}

impl FakeElement {
    fn in_bounds(&self) -> bool {
        let count = self
            .page
            .state
            .count
            .lock()
            .unwrap()
            .get(&self.selector)
            .copied()
            .unwrap_or(0);
        match self.index {
            Some(index) => index < count,
            None => count > 0,
        }
    }

    fn require_exists(&self) -> Result<()> {
        if self.in_bounds() {
            Ok(())
        } else {
            Err(PommelError::ElementNotFound {
                selector: self.selector.clone(),
            })
        }
    }
}

#[async_trait]
impl ElementDriver for FakeElement {
    fn selector(&self) -> &str {
        &self.selector
    }

    async fn click(&self) -> Result<()> {
        self.require_exists()?;
        self.page.record(match self.index {
            Some(index) => RecordedAction::ClickNth {
                selector: self.selector.clone(),
                index,
            },
            None => RecordedAction::Click(self.selector.clone()),
        });
        let target = self
            .page
            .state
            .click_navigations
            .lock()
            .unwrap()
            .get(&self.selector)
            .cloned();
        if let Some(url) = target {
            self.page.set_url(&url);
        }
        Ok(())
    }

    async fn fill(&self, text: &str) -> Result<()> {
        self.require_exists()?;
        self.page.record(RecordedAction::Fill {
            selector: self.selector.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn select_option(&self, value: &str) -> Result<()> {
        self.require_exists()?;
        self.page.record(RecordedAction::SelectOption {
            selector: self.selector.clone(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn set_checked(&self, checked: bool) -> Result<()> {
        self.require_exists()?;
        self.page.record(RecordedAction::SetChecked {
            selector: self.selector.clone(),
            checked,
        });
        Ok(())
    }

    async fn hover(&self) -> Result<()> {
        self.require_exists()?;
        self.page.record(RecordedAction::Hover(self.selector.clone()));
        Ok(())
    }

    async fn press(&self, key: &str) -> Result<()> {
        self.require_exists()?;
        self.page.record(RecordedAction::Press {
            selector: self.selector.clone(),
            key: key.to_string(),
        });
        Ok(())
    }

    async fn text(&self) -> Result<Option<String>> {
        Ok(self
            .page
            .state
            .text
            .lock()
            .unwrap()
            .get(&self.selector)
            .cloned())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .page
            .state
            .attrs
            .lock()
            .unwrap()
            .get(&(self.selector.clone(), name.to_string()))
            .cloned())
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self.page.visible(&self.selector) && self.in_bounds())
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self
            .page
            .state
            .enabled
            .lock()
            .unwrap()
            .get(&self.selector)
            .copied()
            .unwrap_or(true))
    }
}

/// Engine that hands out clones of one shared [`FakePage`].
#[derive(Default)]
pub struct FakeEngine {
    page: FakePage,
    launches: Mutex<Vec<LaunchOptions>>,
    fail_next_launch: Mutex<Option<String>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            page: FakePage::new(),
            ..Default::default()
        }
    }

    /// The shared page, for scripting before launch and inspection after.
    pub fn page(&self) -> FakePage {
        self.page.clone()
    }

    pub fn launches(&self) -> Vec<LaunchOptions> {
        self.launches.lock().unwrap().clone()
    }

    pub fn fail_next_launch(&self, reason: &str) {
        *self.fail_next_launch.lock().unwrap() = Some(reason.to_string());
    }
}

#[async_trait]
impl BrowserEngine for FakeEngine {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageDriver>> {
        if let Some(reason) = self.fail_next_launch.lock().unwrap().take() {
            return Err(PommelError::BrowserLaunch(reason));
        }
        self.launches.lock().unwrap().push(options.clone());
        *self.page.state.closed.lock().unwrap() = false;
        Ok(Box::new(self.page.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_state_answers_probes() {
        let page = FakePage::new();
        page.set_text("h5.card-title", "ZARA COAT 3");
        page.set_texts(".card-body", &["first", "second", "third"]);
        page.set_attribute("#login", "type", "submit");

        let element = page.element("h5.card-title");
        assert_eq!(element.text().await.unwrap().as_deref(), Some("ZARA COAT 3"));
        assert!(element.is_visible().await.unwrap());
        assert_eq!(page.count(".card-body").await.unwrap(), 3);
        assert_eq!(
            page.element("#login").attribute("type").await.unwrap().as_deref(),
            Some("submit")
        );
    }

    #[tokio::test]
    async fn unscripted_selector_is_absent() {
        let page = FakePage::new();
        let element = page.element("#missing");

        assert!(!element.is_visible().await.unwrap());
        assert_eq!(element.text().await.unwrap(), None);
        assert!(matches!(
            element.click().await.unwrap_err(),
            PommelError::ElementNotFound { selector } if selector == "#missing"
        ));
    }

    #[tokio::test]
    async fn actions_are_recorded_in_order() {
        let page = FakePage::new();
        page.show("#userEmail");
        page.show("#login");
        page.on_click_navigate("#login", "https://example.test/#/dashboard/dash");

        page.element("#userEmail").fill("user@example.test").await.unwrap();
        page.element("#login").click().await.unwrap();

        assert_eq!(
            page.actions(),
            vec![
                RecordedAction::Fill {
                    selector: "#userEmail".into(),
                    text: "user@example.test".into(),
                },
                RecordedAction::Click("#login".into()),
            ]
        );
        assert_eq!(
            page.current_url().await.unwrap(),
            "https://example.test/#/dashboard/dash"
        );
    }

    #[tokio::test]
    async fn nth_handles_are_bounds_checked() {
        let page = FakePage::new();
        page.set_texts("h5.card-title", &["ZARA COAT 3", "ADIDAS ORIGINAL"]);

        assert!(page.element_nth("h5.card-title", 1).is_visible().await.unwrap());
        assert!(!page.element_nth("h5.card-title", 2).is_visible().await.unwrap());

        page.element_nth("h5.card-title", 1).click().await.unwrap();
        assert_eq!(
            page.actions(),
            vec![RecordedAction::ClickNth {
                selector: "h5.card-title".into(),
                index: 1,
            }]
        );

        let err = page.element_nth("h5.card-title", 5).click().await.unwrap_err();
        assert!(matches!(err, PommelError::ElementNotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn show_after_tracks_the_tokio_clock() {
        let page = FakePage::new();
        page.show_after("#toast-container", Duration::from_millis(400));

        assert!(!page.element("#toast-container").is_visible().await.unwrap());
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(page.element("#toast-container").is_visible().await.unwrap());
    }

    #[tokio::test]
    async fn screenshot_writes_png_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let page = FakePage::new();

        let size = page.screenshot(&path).await.unwrap();
        assert_eq!(size, 4);
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(page.screenshots(), vec![path]);
    }

    #[tokio::test]
    async fn engine_shares_one_page_and_can_fail() {
        let engine = FakeEngine::new();
        engine.page().set_title("Let's Shop");

        let driver = engine
            .launch(&LaunchOptions {
                browser: crate::config::BrowserKind::Firefox,
                headed: true,
                slow_mo: Duration::ZERO,
                timeout: Duration::from_secs(30),
                cdp_endpoint: None,
            })
            .await
            .unwrap();
        assert_eq!(driver.title().await.unwrap(), "Let's Shop");
        assert_eq!(engine.launches()[0].browser, crate::config::BrowserKind::Firefox);

        engine.fail_next_launch("no display server");
        let options = engine.launches()[0].clone();
        let Err(err) = engine.launch(&options).await else {
            panic!("scripted launch failure must surface");
        };
        assert!(matches!(err, PommelError::BrowserLaunch(_)));
    }
}
