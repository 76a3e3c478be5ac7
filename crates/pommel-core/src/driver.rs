//! Browser engine seam.
//!
//! Everything above this module talks to the browser through the
//! [`BrowserEngine`], [`PageDriver`] and [`ElementDriver`] traits. The CDP
//! implementation lives in its own crate; tests substitute a scripted fake
//! from [`crate::testing`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::BrowserKind;
use crate::error::Result;

/// Parameters for bringing up a browser page.
#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub browser: BrowserKind,
    pub headed: bool,
    pub slow_mo: Duration,
    pub timeout: Duration,
    /// Attach to an already-running browser over this DevTools endpoint
    /// instead of launching one.
    pub cdp_endpoint: Option<String>,
}

/// Page lifecycle milestones, in the order a load reaches them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    DomContentLoaded,
    #[default]
    Load,
    NetworkIdle,
}

impl LoadState {
    fn rank(self) -> u8 {
        match self {
            LoadState::DomContentLoaded => 0,
            LoadState::Load => 1,
            LoadState::NetworkIdle => 2,
        }
    }

    /// Whether a page observed at `self` has passed `target`.
    pub fn reached(self, target: LoadState) -> bool {
        self.rank() >= target.rank()
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::DomContentLoaded => write!(f, "domcontentloaded"),
            LoadState::Load => write!(f, "load"),
            LoadState::NetworkIdle => write!(f, "networkidle"),
        }
    }
}

/// Element condition a wait can target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectorState {
    /// Present in the DOM, visible or not.
    Attached,
    #[default]
    Visible,
    /// Absent from the DOM, or present but not visible.
    Hidden,
}

impl fmt::Display for SelectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorState::Attached => write!(f, "attached"),
            SelectorState::Visible => write!(f, "visible"),
            SelectorState::Hidden => write!(f, "hidden"),
        }
    }
}

/// Launches (or attaches to) a browser and hands back a driven page.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageDriver>>;
}

/// One browser page. All calls are one-shot: no retries, no waiting beyond
/// what the underlying protocol does. Polling and timeouts live a layer up.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    async fn title(&self) -> Result<String>;

    /// Furthest load milestone the page has reached, `None` while the
    /// document is still loading.
    async fn load_state(&self) -> Result<Option<LoadState>>;

    /// Handle on the first element matching `selector`. Building the handle
    /// never touches the page; missing elements surface when it is used.
    fn element<'a>(&'a self, selector: &str) -> Box<dyn ElementDriver + 'a>;

    /// Handle on the `index`-th match of `selector`, zero-based, in DOM
    /// order.
    fn element_nth<'a>(&'a self, selector: &str, index: usize) -> Box<dyn ElementDriver + 'a>;

    /// Text contents of every element matching `selector`, in DOM order.
    async fn texts(&self, selector: &str) -> Result<Vec<String>>;

    /// Number of elements matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Write a full-page screenshot to `path`, returning its size in bytes.
    async fn screenshot(&self, path: &Path) -> Result<u64>;

    /// Recording of this page, once the page is closed. `None` when the
    /// engine does not record video.
    async fn video_path(&self) -> Option<PathBuf>;

    async fn close(&self) -> Result<()>;
}

/// One element, addressed by selector.
#[async_trait]
pub trait ElementDriver: Send + Sync {
    fn selector(&self) -> &str;

    async fn click(&self) -> Result<()>;

    async fn fill(&self, text: &str) -> Result<()>;

    async fn select_option(&self, value: &str) -> Result<()>;

    async fn set_checked(&self, checked: bool) -> Result<()>;

    async fn hover(&self) -> Result<()>;

    async fn press(&self, key: &str) -> Result<()>;

    /// Text content, `None` when the element is not in the DOM.
    async fn text(&self) -> Result<Option<String>>;

    /// Attribute value, `None` when absent (element or attribute).
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// `false` when detached or not rendered; never errors on absence.
    async fn is_visible(&self) -> Result<bool>;

    async fn is_enabled(&self) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_states_are_ordered() {
        assert!(LoadState::NetworkIdle.reached(LoadState::Load));
        assert!(LoadState::Load.reached(LoadState::DomContentLoaded));
        assert!(LoadState::Load.reached(LoadState::Load));
        assert!(!LoadState::DomContentLoaded.reached(LoadState::NetworkIdle));
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(LoadState::DomContentLoaded.to_string(), "domcontentloaded");
        assert_eq!(LoadState::NetworkIdle.to_string(), "networkidle");
        assert_eq!(SelectorState::Hidden.to_string(), "hidden");
    }
}
