//! Element handle resolving its selector on every operation.
//!
//! Handles are cheap selector wrappers, not live remote references. Each
//! action re-queries the DOM so a handle taken before a re-render still
//! works afterwards.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Element, Page};
use tokio::time::sleep;

use pommel_core::driver::ElementDriver;
use pommel_core::error::{PommelError, Result};

use crate::engine_err;

const VISIBLE_JS: &str = "function() { \
    if (!this.isConnected) return false; \
    const rect = this.getBoundingClientRect(); \
    if (rect.width === 0 || rect.height === 0) return false; \
    const style = window.getComputedStyle(this); \
    return style.visibility !== 'hidden' && style.display !== 'none'; \
}";

const ENABLED_JS: &str = "function() { return !this.disabled; }";

pub struct CdpElement {
    page: Page,
    selector: String,
    /// `Some` when the handle addresses one match of a many-element
    /// selector, in DOM order.
    index: Option<usize>,
    slow_mo: Duration,
}

impl CdpElement {
    pub(crate) fn new(page: Page, selector: String, index: Option<usize>, slow_mo: Duration) -> Self {
        Self {
            page,
            selector,
            index,
            slow_mo,
        }
    }

    fn target(&self) -> String {
        match self.index {
            Some(index) => format!("{} [{index}]", self.selector),
            None => self.selector.clone(),
        }
    }

    async fn locate(&self) -> Option<Element> {
        match self.index {
            None => self.page.find_element(&self.selector).await.ok(),
            Some(index) => self
                .page
                .find_elements(&self.selector)
                .await
                .ok()
                .and_then(|matches| matches.into_iter().nth(index)),
        }
    }

    async fn find(&self) -> Result<Element> {
        self.locate()
            .await
            .ok_or_else(|| PommelError::ElementNotFound {
                selector: self.target(),
            })
    }

    async fn pace(&self) {
        if !self.slow_mo.is_zero() {
            sleep(self.slow_mo).await;
        }
    }

    async fn eval_bool(&self, js: &str, absent: bool) -> Result<bool> {
        let Some(element) = self.locate().await else {
            return Ok(absent);
        };
        let returns = element.call_js_fn(js, false).await.map_err(engine_err)?;
        Ok(returns
            .result
            .value
            .and_then(|value| value.as_bool())
            .unwrap_or(absent))
    }
}

#[async_trait]
impl ElementDriver for CdpElement {
    fn selector(&self) -> &str {
        &self.selector
    }

    async fn click(&self) -> Result<()> {
        self.pace().await;
        let element = self.find().await?;
        element.click().await.map_err(engine_err)?;
        Ok(())
    }

    async fn fill(&self, text: &str) -> Result<()> {
        self.pace().await;
        let element = self.find().await?;
        let js = format!(
            "function() {{ \
                this.focus(); \
                this.value = '{}'; \
                this.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                this.dispatchEvent(new Event('change', {{ bubbles: true }})); \
            }}",
            escape_js(text)
        );
        element.call_js_fn(js, false).await.map_err(engine_err)?;
        Ok(())
    }

    async fn select_option(&self, value: &str) -> Result<()> {
        self.pace().await;
        let element = self.find().await?;
        let js = format!(
            "function() {{ \
                this.value = '{}'; \
                this.dispatchEvent(new Event('change', {{ bubbles: true }})); \
            }}",
            escape_js(value)
        );
        element.call_js_fn(js, false).await.map_err(engine_err)?;
        Ok(())
    }

    async fn set_checked(&self, checked: bool) -> Result<()> {
        self.pace().await;
        let element = self.find().await?;
        // Clicking (rather than assigning .checked) fires the change events
        // a real user would produce.
        let js = format!("function() {{ if (this.checked !== {checked}) this.click(); }}");
        element.call_js_fn(js, false).await.map_err(engine_err)?;
        Ok(())
    }

    async fn hover(&self) -> Result<()> {
        self.pace().await;
        let element = self.find().await?;
        element.hover().await.map_err(engine_err)?;
        Ok(())
    }

    async fn press(&self, key: &str) -> Result<()> {
        self.pace().await;
        let element = self.find().await?;
        element.press_key(key).await.map_err(engine_err)?;
        Ok(())
    }

    async fn text(&self) -> Result<Option<String>> {
        let Some(element) = self.locate().await else {
            return Ok(None);
        };
        element.inner_text().await.map_err(engine_err)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let Some(element) = self.locate().await else {
            return Ok(None);
        };
        element.attribute(name).await.map_err(engine_err)
    }

    async fn is_visible(&self) -> Result<bool> {
        self.eval_bool(VISIBLE_JS, false).await
    }

    async fn is_enabled(&self) -> Result<bool> {
        // `disabled` is undefined on non-form elements, which reads as enabled.
        self.eval_bool(ENABLED_JS, true).await
    }
}

/// Escapes text for a single-quoted JS string literal. Raw line terminators
/// (including U+2028/U+2029) would end the literal early.
fn escape_js(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(escape_js("it's"), "it\\'s");
        assert_eq!(escape_js(r"C:\temp"), r"C:\\temp");
        assert_eq!(escape_js(r"a\'b"), r"a\\\'b");
    }

    #[test]
    fn escapes_line_terminators() {
        assert_eq!(escape_js("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_js("a\r\nb"), "a\\r\\nb");
        assert_eq!(escape_js("p\u{2028}q"), "p\\u2028q");
        assert_eq!(escape_js("p\u{2029}q"), "p\\u2029q");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(escape_js("iphone 13"), "iphone 13");
    }
}
