//! Products dashboard with its search bar and result grid.

use pommel_core::driver::{LoadState, SelectorState};
use pommel_core::error::{PommelError, Result};
use pommel_core::interactor::Interactor;

const SOURCE: &str = "ProductsPage";

const SEARCH_INPUT: &str = "input[placeholder='search']";
const PRODUCT_CARDS: &str = ".card-body";
const PRODUCT_NAMES: &str = "h5.card-title";
const ADD_TO_CART_BUTTONS: &str = ".card-body button:last-of-type";
const SIGNOUT_BUTTON: &str = "nav button:last-of-type";

pub struct ProductsPage {
    ui: Interactor,
}

impl ProductsPage {
    pub fn new(interactor: &Interactor) -> Self {
        Self {
            ui: interactor.with_source(SOURCE),
        }
    }

    /// Resolves once the product grid has rendered.
    pub async fn wait_until_loaded(&self) -> Result<()> {
        self.ui
            .wait_for_selector(PRODUCT_CARDS, SelectorState::Visible)
            .await
    }

    /// Full search flow: focus the box, type, submit, settle.
    pub async fn search_product(&self, product_name: &str) -> Result<()> {
        self.ui.click(SEARCH_INPUT).await?;
        self.ui.fill(SEARCH_INPUT, product_name).await?;
        self.ui.press(SEARCH_INPUT, "Enter").await?;
        self.ui.wait_for_load_state(LoadState::NetworkIdle).await
    }

    pub async fn product_names(&self) -> Result<Vec<String>> {
        self.ui.texts(PRODUCT_NAMES).await
    }

    pub async fn product_count(&self) -> Result<usize> {
        self.ui.count(PRODUCT_CARDS).await
    }

    /// Count advertised by the "Showing N results" banner, when one is on
    /// the page.
    pub async fn results_count(&self) -> Result<Option<usize>> {
        let body = self.ui.text("body").await?;
        Ok(body.as_deref().and_then(parse_results_count))
    }

    /// Whether every product name contains `keyword`, case-insensitively.
    /// An empty grid fails the check.
    pub async fn all_products_contain(&self, keyword: &str) -> Result<bool> {
        let names = self.product_names().await?;
        if names.is_empty() {
            self.ui.log().warn(SOURCE, "No products on the grid");
            return Ok(false);
        }

        let needle = keyword.to_lowercase();
        let misses: Vec<&String> = names
            .iter()
            .filter(|name| !name.to_lowercase().contains(&needle))
            .collect();
        if !misses.is_empty() {
            self.ui.log().error(
                SOURCE,
                format!("Products not containing '{keyword}': {misses:?}"),
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Adds the named product to the cart. The card is resolved by matching
    /// `product_name` against the rendered titles, so titles and cart
    /// buttons must come from the same grid.
    pub async fn add_to_cart_by_name(&self, product_name: &str) -> Result<()> {
        let names = self.product_names().await?;
        let index = names
            .iter()
            .position(|name| name.trim().eq_ignore_ascii_case(product_name.trim()))
            .ok_or_else(|| PommelError::ElementNotFound {
                selector: format!("product card titled '{product_name}'"),
            })?;
        self.ui.click_nth(ADD_TO_CART_BUTTONS, index).await
    }

    pub async fn click_signout(&self) -> Result<()> {
        self.ui.click(SIGNOUT_BUTTON).await?;
        self.ui.wait_for_load_state(LoadState::NetworkIdle).await
    }

    pub async fn is_on_products_page(&self) -> Result<bool> {
        let url = self.ui.current_url().await?;
        Ok(url.contains("/dashboard/dash") && self.ui.is_visible(SEARCH_INPUT).await?)
    }
}

/// Pulls N out of a "Showing N results" banner anywhere in `text`.
fn parse_results_count(text: &str) -> Option<usize> {
    let after = &text[text.find("Showing")? + "Showing".len()..];
    let digits: String = after
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use pommel_core::logging::ActionLog;
    use pommel_core::testing::{FakePage, RecordedAction};

    use super::*;

    fn products(page: &FakePage) -> ProductsPage {
        let ix = Interactor::new(
            Arc::new(page.clone()),
            ActionLog::new(),
            "Test",
            Duration::from_secs(1),
        );
        ProductsPage::new(&ix)
    }

    #[tokio::test]
    async fn add_to_cart_clicks_the_named_card_button() {
        let page = FakePage::new();
        page.set_texts(
            PRODUCT_NAMES,
            &["ZARA COAT 3", "ADIDAS ORIGINAL", "IPHONE 13 PRO"],
        );
        page.set_count(ADD_TO_CART_BUTTONS, 3);

        products(&page)
            .add_to_cart_by_name("adidas original")
            .await
            .unwrap();

        assert_eq!(
            page.actions(),
            vec![RecordedAction::ClickNth {
                selector: ADD_TO_CART_BUTTONS.into(),
                index: 1,
            }]
        );
    }

    #[tokio::test]
    async fn add_to_cart_rejects_unknown_products() {
        let page = FakePage::new();
        page.set_texts(PRODUCT_NAMES, &["ZARA COAT 3"]);

        let err = products(&page)
            .add_to_cart_by_name("PIXEL 9")
            .await
            .unwrap_err();
        assert!(matches!(err, PommelError::ElementNotFound { .. }));
        assert!(page.actions().is_empty());
    }

    #[test]
    fn parses_the_banner_count() {
        assert_eq!(parse_results_count("Showing 3 results |"), Some(3));
        assert_eq!(parse_results_count("menu\nShowing 12 results | footer"), Some(12));
    }

    #[test]
    fn missing_or_malformed_banner_is_none() {
        assert_eq!(parse_results_count("no banner here"), None);
        assert_eq!(parse_results_count("Showing results"), None);
    }
}
