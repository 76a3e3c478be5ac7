//! Logged page interaction layer.
//!
//! An [`Interactor`] wraps a [`PageDriver`] with the behavior every page
//! object needs: actionability polling before actions, deadline-bounded
//! waits, explicit assertions and a log record on both sides of every
//! operation. Pages derive their own interactor with [`Interactor::with_source`]
//! so records carry the page name that produced them.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use regex_lite::Regex;
use tokio::time::Instant;

use crate::driver::{ElementDriver, LoadState, PageDriver, SelectorState};
use crate::error::{PommelError, Result};
use crate::logging::{ActionLog, LogLevel};

/// Interval between actionability and wait probes.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Grace period before an assertion probes the page, so a render in flight
/// settles first.
const ASSERT_SETTLE: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub struct Interactor {
    driver: Arc<dyn PageDriver>,
    log: ActionLog,
    source: String,
    timeout: Duration,
    poll: Duration,
}

impl Interactor {
    pub fn new(driver: Arc<dyn PageDriver>, log: ActionLog, source: &str, timeout: Duration) -> Self {
        Self {
            driver,
            log,
            source: source.to_string(),
            timeout,
            poll: POLL_INTERVAL,
        }
    }

    /// Same page and log, records attributed to `source`.
    pub fn with_source(&self, source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..self.clone()
        }
    }

    /// Same interactor with a different deadline for actions and waits.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    // --- navigation ---

    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Navigating to URL: {url}"),
            |_| format!("Successfully navigated to: {url}"),
            "Navigation failed",
            self.driver.goto(url),
        )
        .await
    }

    // --- actions ---

    pub async fn click(&self, selector: &str) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Clicking on element: {selector}"),
            |_| format!("Clicked on element: {selector}"),
            "Click failed",
            self.act(selector, None, ElementAction::Click),
        )
        .await
    }

    /// Click the `index`-th element matching `selector`, zero-based. For
    /// grids where one selector matches every card.
    pub async fn click_nth(&self, selector: &str, index: usize) -> Result<()> {
        let target = target_label(selector, Some(index));
        self.run_logged(
            LogLevel::Info,
            format!("Clicking on element: {target}"),
            |_| format!("Clicked on element: {target}"),
            "Click failed",
            self.act(selector, Some(index), ElementAction::Click),
        )
        .await
    }

    pub async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Filling text '{text}' into element: {selector}"),
            |_| format!("Filled text into element: {selector}"),
            "Fill failed",
            self.act(selector, None, ElementAction::Fill(text.to_string())),
        )
        .await
    }

    pub async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Selecting option '{value}' in element: {selector}"),
            |_| format!("Selected option '{value}' in element: {selector}"),
            "Select failed",
            self.act(selector, None, ElementAction::Select(value.to_string())),
        )
        .await
    }

    pub async fn check(&self, selector: &str) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Checking element: {selector}"),
            |_| format!("Checked element: {selector}"),
            "Check failed",
            self.act(selector, None, ElementAction::SetChecked(true)),
        )
        .await
    }

    pub async fn uncheck(&self, selector: &str) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Unchecking element: {selector}"),
            |_| format!("Unchecked element: {selector}"),
            "Uncheck failed",
            self.act(selector, None, ElementAction::SetChecked(false)),
        )
        .await
    }

    pub async fn hover(&self, selector: &str) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Hovering over element: {selector}"),
            |_| format!("Hovered over element: {selector}"),
            "Hover failed",
            self.act(selector, None, ElementAction::Hover),
        )
        .await
    }

    pub async fn press(&self, selector: &str, key: &str) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Pressing key '{key}' on element: {selector}"),
            |_| format!("Pressed key '{key}' on element: {selector}"),
            "Press failed",
            self.act(selector, None, ElementAction::Press(key.to_string())),
        )
        .await
    }

    // --- probes ---

    pub async fn current_url(&self) -> Result<String> {
        self.run_logged(
            LogLevel::Debug,
            "Reading current URL".to_string(),
            |url: &String| format!("Current URL: {url}"),
            "Reading current URL failed",
            self.driver.current_url(),
        )
        .await
    }

    pub async fn title(&self) -> Result<String> {
        self.run_logged(
            LogLevel::Debug,
            "Reading page title".to_string(),
            |title: &String| format!("Page title: {title}"),
            "Reading page title failed",
            self.driver.title(),
        )
        .await
    }

    pub async fn text(&self, selector: &str) -> Result<Option<String>> {
        self.run_logged(
            LogLevel::Debug,
            format!("Reading text from element: {selector}"),
            |_| format!("Read text from element: {selector}"),
            "Reading text failed",
            async { self.driver.element(selector).text().await },
        )
        .await
    }

    pub async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        self.run_logged(
            LogLevel::Debug,
            format!("Reading texts of elements: {selector}"),
            |texts: &Vec<String>| format!("Read {} texts from: {selector}", texts.len()),
            "Reading texts failed",
            self.driver.texts(selector),
        )
        .await
    }

    pub async fn count(&self, selector: &str) -> Result<usize> {
        self.run_logged(
            LogLevel::Debug,
            format!("Counting elements: {selector}"),
            |count: &usize| format!("Counted {count} elements: {selector}"),
            "Counting elements failed",
            self.driver.count(selector),
        )
        .await
    }

    pub async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        self.run_logged(
            LogLevel::Debug,
            format!("Reading attribute '{name}' of element: {selector}"),
            |_| format!("Read attribute '{name}' of element: {selector}"),
            "Reading attribute failed",
            async { self.driver.element(selector).attribute(name).await },
        )
        .await
    }

    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.run_logged(
            LogLevel::Debug,
            format!("Checking visibility of element: {selector}"),
            |visible: &bool| format!("Element {selector} visible: {visible}"),
            "Visibility check failed",
            async { self.driver.element(selector).is_visible().await },
        )
        .await
    }

    // --- waits ---

    pub async fn wait_for_selector(&self, selector: &str, state: SelectorState) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Waiting for selector '{selector}' to be {state}"),
            |_| format!("Selector '{selector}' is {state}"),
            "Wait failed",
            self.wait_until(WaitCheck::Selector {
                selector: selector.to_string(),
                state,
            }),
        )
        .await
    }

    pub async fn wait_for_url(&self, pattern: &str) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Waiting for URL to match: {pattern}"),
            |_| format!("URL matched: {pattern}"),
            "Wait failed",
            self.wait_until(WaitCheck::Url {
                pattern: pattern.to_string(),
            }),
        )
        .await
    }

    pub async fn wait_for_load_state(&self, state: LoadState) -> Result<()> {
        self.run_logged(
            LogLevel::Info,
            format!("Waiting for load state: {state}"),
            |_| format!("Reached load state: {state}"),
            "Wait failed",
            self.wait_until(WaitCheck::Load { state }),
        )
        .await
    }

    // --- assertions ---

    pub async fn assert_visible(&self, selector: &str) -> Result<()> {
        let description = format!("Element {selector} should be visible");
        self.begin_assertion(&description).await;
        let visible =
            self.note_probe_failure(self.driver.element(selector).is_visible().await)?;
        self.finish_assertion(&description, visible, "visible", "hidden")
    }

    pub async fn assert_hidden(&self, selector: &str) -> Result<()> {
        let description = format!("Element {selector} should be hidden");
        self.begin_assertion(&description).await;
        let visible =
            self.note_probe_failure(self.driver.element(selector).is_visible().await)?;
        self.finish_assertion(&description, !visible, "hidden", "visible")
    }

    pub async fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let description = format!("Element {selector} should have text '{expected}'");
        self.begin_assertion(&description).await;
        let actual = self.note_probe_failure(self.driver.element(selector).text().await)?;
        let passed = actual.as_deref().map(str::trim) == Some(expected.trim());
        let shown = actual.as_deref().unwrap_or("<no text>");
        self.finish_assertion(&description, passed, expected, shown)
    }

    pub async fn assert_url(&self, pattern: &str) -> Result<()> {
        let description = format!("URL should match '{pattern}'");
        self.begin_assertion(&description).await;
        let actual = self.note_probe_failure(self.driver.current_url().await)?;
        let passed = url_matches(&actual, pattern);
        self.finish_assertion(&description, passed, pattern, &actual)
    }

    pub async fn assert_title(&self, expected: &str) -> Result<()> {
        let description = format!("Page title should be '{expected}'");
        self.begin_assertion(&description).await;
        let actual = self.note_probe_failure(self.driver.title().await)?;
        let passed = actual == expected;
        self.finish_assertion(&description, passed, expected, &actual)
    }

    pub async fn assert_attribute(&self, selector: &str, name: &str, expected: &str) -> Result<()> {
        let description = format!("Element {selector} should have {name}='{expected}'");
        self.begin_assertion(&description).await;
        let actual =
            self.note_probe_failure(self.driver.element(selector).attribute(name).await)?;
        let passed = actual.as_deref() == Some(expected);
        let shown = actual.as_deref().unwrap_or("<absent>");
        self.finish_assertion(&description, passed, expected, shown)
    }

    // --- internals ---

    /// Log a record before and after `op`. The post record carries the
    /// outcome: `level` on success, error on failure. Every public operation
    /// funnels through here, so each produces exactly two records.
    async fn run_logged<T, F, P>(
        &self,
        level: LogLevel,
        pre: String,
        post: P,
        fail: &str,
        op: F,
    ) -> Result<T>
    where
        F: Future<Output = Result<T>>,
        P: FnOnce(&T) -> String,
    {
        self.log.record(level, &self.source, pre);
        match op.await {
            Ok(value) => {
                self.log.record(level, &self.source, post(&value));
                Ok(value)
            }
            Err(err) => {
                self.log.error(&self.source, format!("{fail}: {err}"));
                Err(err)
            }
        }
    }

    /// Poll until the target is visible and enabled, then perform `action`
    /// once. Gives up at exactly the configured timeout.
    async fn act(&self, selector: &str, index: Option<usize>, action: ElementAction) -> Result<()> {
        self.wait_actionable(selector, index, action.name()).await?;
        let element = self.element_for(selector, index);
        match &action {
            ElementAction::Click => element.click().await,
            ElementAction::Fill(text) => element.fill(text).await,
            ElementAction::Select(value) => element.select_option(value).await,
            ElementAction::SetChecked(checked) => element.set_checked(*checked).await,
            ElementAction::Hover => element.hover().await,
            ElementAction::Press(key) => element.press(key).await,
        }
    }

    async fn wait_actionable(
        &self,
        selector: &str,
        index: Option<usize>,
        action: &'static str,
    ) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let element = self.element_for(selector, index);
            if element.is_visible().await? && element.is_enabled().await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(PommelError::Interaction {
                    action,
                    selector: target_label(selector, index),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(remaining.min(self.poll)).await;
        }
    }

    fn element_for(&self, selector: &str, index: Option<usize>) -> Box<dyn ElementDriver + '_> {
        match index {
            Some(index) => self.driver.element_nth(selector, index),
            None => self.driver.element(selector),
        }
    }

    async fn wait_until(&self, check: WaitCheck) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if check.satisfied(self.driver.as_ref()).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(PommelError::Timeout {
                    ms: self.timeout.as_millis() as u64,
                    condition: check.condition(),
                });
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(remaining.min(self.poll)).await;
        }
    }

    async fn begin_assertion(&self, description: &str) {
        self.log
            .info(&self.source, format!("Asserting: {description}"));
        tokio::time::sleep(ASSERT_SETTLE).await;
    }

    fn note_probe_failure<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.log
                .error(&self.source, format!("Assertion probe failed: {err}"));
        }
        result
    }

    fn finish_assertion(
        &self,
        description: &str,
        passed: bool,
        expected: &str,
        actual: &str,
    ) -> Result<()> {
        self.log.assertion(&self.source, description, passed);
        if passed {
            Ok(())
        } else {
            Err(PommelError::Assertion {
                description: description.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }
}

enum ElementAction {
    Click,
    Fill(String),
    Select(String),
    SetChecked(bool),
    Hover,
    Press(String),
}

impl ElementAction {
    fn name(&self) -> &'static str {
        match self {
            ElementAction::Click => "click",
            ElementAction::Fill(_) => "fill",
            ElementAction::Select(_) => "select",
            ElementAction::SetChecked(true) => "check",
            ElementAction::SetChecked(false) => "uncheck",
            ElementAction::Hover => "hover",
            ElementAction::Press(_) => "press",
        }
    }
}

enum WaitCheck {
    Selector { selector: String, state: SelectorState },
    Url { pattern: String },
    Load { state: LoadState },
}

impl WaitCheck {
    fn condition(&self) -> String {
        match self {
            WaitCheck::Selector { selector, state } => {
                format!("selector '{selector}' to be {state}")
            }
            WaitCheck::Url { pattern } => format!("URL matching '{pattern}'"),
            WaitCheck::Load { state } => format!("load state '{state}'"),
        }
    }

    async fn satisfied(&self, driver: &dyn PageDriver) -> Result<bool> {
        match self {
            WaitCheck::Selector { selector, state } => match state {
                SelectorState::Attached => Ok(driver.count(selector).await? > 0),
                SelectorState::Visible => driver.element(selector).is_visible().await,
                SelectorState::Hidden => Ok(!driver.element(selector).is_visible().await?),
            },
            WaitCheck::Url { pattern } => Ok(url_matches(&driver.current_url().await?, pattern)),
            WaitCheck::Load { state } => Ok(driver
                .load_state()
                .await?
                .is_some_and(|observed| observed.reached(*state))),
        }
    }
}

/// Display form of a selector target, `sel [i]` for indexed matches.
fn target_label(selector: &str, index: Option<usize>) -> String {
    match index {
        Some(index) => format!("{selector} [{index}]"),
        None => selector.to_string(),
    }
}

/// Match a URL against a pattern. Patterns without wildcards match on
/// trailing-slash-insensitive equality or substring containment; patterns
/// with wildcards are globs where `**` crosses `/` and `*` does not.
fn url_matches(url: &str, pattern: &str) -> bool {
    if !pattern.contains('*') {
        return url.trim_end_matches('/') == pattern.trim_end_matches('/')
            || url.contains(pattern);
    }
    match Regex::new(&glob_to_regex(pattern)) {
        Ok(re) => re.is_match(url),
        Err(_) => false,
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    regex.push_str(".*");
                } else {
                    regex.push_str("[^/]*");
                }
            }
            '\\' | '.' | '+' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '?' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
    }
    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::testing::{FakePage, RecordedAction};

    fn interactor(page: &FakePage, timeout: Duration) -> Interactor {
        Interactor::new(
            Arc::new(page.clone()),
            ActionLog::new(),
            "TestPage",
            timeout,
        )
    }

    #[tokio::test]
    async fn click_logs_exactly_two_info_records() {
        let page = FakePage::new();
        page.show("#login");
        let ix = interactor(&page, Duration::from_secs(1));

        ix.click("#login").await.unwrap();

        let records = ix.log().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "Clicking on element: #login");
        assert_eq!(records[1].message, "Clicked on element: #login");
        assert!(records.iter().all(|r| r.level == LogLevel::Info));
        assert_eq!(page.actions(), vec![RecordedAction::Click("#login".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_click_logs_error_post_record() {
        let page = FakePage::new();
        let ix = interactor(&page, Duration::from_millis(500));

        let err = ix.click("#missing").await.unwrap_err();

        assert!(matches!(
            err,
            PommelError::Interaction {
                action: "click",
                timeout_ms: 500,
                ..
            }
        ));
        let records = ix.log().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, LogLevel::Info);
        assert_eq!(records[1].level, LogLevel::Error);
        assert!(records[1].message.starts_with("Click failed:"));
        assert!(page.actions().is_empty());
    }

    #[tokio::test]
    async fn click_nth_targets_one_match_of_many() {
        let page = FakePage::new();
        page.set_count(".card-body button:last-of-type", 3);
        let ix = interactor(&page, Duration::from_secs(1));

        ix.click_nth(".card-body button:last-of-type", 2).await.unwrap();

        let records = ix.log().records();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].message,
            "Clicking on element: .card-body button:last-of-type [2]"
        );
        assert_eq!(
            page.actions(),
            vec![RecordedAction::ClickNth {
                selector: ".card-body button:last-of-type".into(),
                index: 2,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_element_is_not_actionable() {
        let page = FakePage::new();
        page.show("#login");
        page.set_enabled("#login", false);
        let ix = interactor(&page, Duration::from_millis(300));

        let err = ix.click("#login").await.unwrap_err();
        assert!(matches!(err, PommelError::Interaction { action: "click", .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn satisfied_wait_returns_without_sleeping() {
        let page = FakePage::new();
        page.show("#toast-container");
        let ix = interactor(&page, Duration::from_secs(30));

        let before = Instant::now();
        ix.wait_for_selector("#toast-container", SelectorState::Visible)
            .await
            .unwrap();
        assert_eq!(Instant::now(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn never_true_wait_fails_at_exactly_the_timeout() {
        let page = FakePage::new();
        let ix = interactor(&page, Duration::from_secs(3));

        let before = Instant::now();
        let err = ix
            .wait_for_selector("#ghost", SelectorState::Visible)
            .await
            .unwrap_err();

        assert_eq!(Instant::now() - before, Duration::from_secs(3));
        match err {
            PommelError::Timeout { ms, condition } => {
                assert_eq!(ms, 3000);
                assert_eq!(condition, "selector '#ghost' to be visible");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn late_element_is_picked_up_by_polling() {
        let page = FakePage::new();
        page.show_after("#dashboard", Duration::from_millis(900));
        let ix = interactor(&page, Duration::from_secs(30));

        let before = Instant::now();
        ix.wait_for_selector("#dashboard", SelectorState::Visible)
            .await
            .unwrap();
        assert_eq!(Instant::now() - before, Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_url_matches_glob_after_redirect() {
        let page = FakePage::new();
        page.set_url("https://example.test/client/#/auth/login");
        page.set_url_after(
            Duration::from_millis(500),
            "https://example.test/client/#/dashboard/dash",
        );
        let ix = interactor(&page, Duration::from_secs(5));

        ix.wait_for_url("**/dashboard/dash").await.unwrap();
        assert_eq!(
            page.current_url().await.unwrap(),
            "https://example.test/client/#/dashboard/dash"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_load_state_accepts_further_milestones() {
        let page = FakePage::new();
        page.set_load_state(Some(LoadState::NetworkIdle));
        let ix = interactor(&page, Duration::from_secs(1));

        ix.wait_for_load_state(LoadState::Load).await.unwrap();

        page.set_load_state(None);
        let err = ix
            .wait_for_load_state(LoadState::DomContentLoaded)
            .await
            .unwrap_err();
        assert!(matches!(err, PommelError::Timeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn assert_text_reports_both_sides_on_failure() {
        let page = FakePage::new();
        page.set_text("h5.card-title", "ZARA COAT 3");
        let ix = interactor(&page, Duration::from_secs(1));

        ix.assert_text("h5.card-title", "ZARA COAT 3").await.unwrap();

        let err = ix
            .assert_text("h5.card-title", "ADIDAS ORIGINAL")
            .await
            .unwrap_err();
        match err {
            PommelError::Assertion {
                expected, actual, ..
            } => {
                assert_eq!(expected, "ADIDAS ORIGINAL");
                assert_eq!(actual, "ZARA COAT 3");
            }
            other => panic!("unexpected error: {other}"),
        }

        let records = ix.log().records();
        assert_eq!(records.len(), 4);
        assert!(records[1].message.starts_with("ASSERTION [PASSED]:"));
        assert!(records[3].message.starts_with("ASSERTION [FAILED]:"));
        assert_eq!(records[3].level, LogLevel::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn assert_hidden_fails_on_visible_element() {
        let page = FakePage::new();
        page.show("#toast-container");
        let ix = interactor(&page, Duration::from_secs(1));

        let err = ix.assert_hidden("#toast-container").await.unwrap_err();
        assert!(matches!(err, PommelError::Assertion { .. }));

        let records = ix.log().records();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].message,
            "Asserting: Element #toast-container should be hidden"
        );
    }

    #[tokio::test]
    async fn with_source_relabels_records() {
        let page = FakePage::new();
        page.show("#login");
        let ix = interactor(&page, Duration::from_secs(1));
        let login = ix.with_source("LoginPage");

        login.click("#login").await.unwrap();

        assert_eq!(login.log().records_from("LoginPage").len(), 2);
        assert!(login.log().records_from("TestPage").is_empty());
    }

    #[test]
    fn url_matching_rules() {
        // exact and trailing-slash-insensitive
        assert!(url_matches("https://a.test/app/", "https://a.test/app"));
        assert!(url_matches("https://a.test/app", "https://a.test/app/"));
        // containment for wildcard-free patterns
        assert!(url_matches(
            "https://a.test/client/#/dashboard/dash",
            "/dashboard/dash"
        ));
        // ** crosses slashes, * does not
        assert!(url_matches(
            "https://a.test/client/#/dashboard/dash",
            "**/dashboard/dash"
        ));
        assert!(url_matches("https://a.test/shop/42", "https://a.test/shop/*"));
        assert!(!url_matches(
            "https://a.test/shop/42/reviews",
            "https://a.test/shop/*"
        ));
        assert!(!url_matches("https://a.test/cart", "**/dashboard/dash"));
        // regex metacharacters in URLs stay literal
        assert!(url_matches("https://a.test/c?q=1", "**/c?q=1"));
    }
}
