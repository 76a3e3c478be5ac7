//! Product search workflows.

use pommel_core::error::{PommelError, Result};
use pommel_core::interactor::Interactor;

use crate::pages::products::ProductsPage;

const SOURCE: &str = "SearchSteps";

pub struct SearchSteps {
    ui: Interactor,
    products_page: ProductsPage,
}

impl SearchSteps {
    pub fn new(interactor: &Interactor) -> Self {
        Self {
            ui: interactor.with_source(SOURCE),
            products_page: ProductsPage::new(interactor),
        }
    }

    pub async fn search_for_product(&self, product_name: &str) -> Result<()> {
        self.ui
            .log()
            .step(SOURCE, &format!("Searching for product: {product_name}"));
        self.products_page.search_product(product_name).await
    }

    pub async fn product_names(&self) -> Result<Vec<String>> {
        self.products_page.product_names().await
    }

    pub async fn product_count(&self) -> Result<usize> {
        self.products_page.product_count().await
    }

    /// Asserts every result name carries `keyword`.
    pub async fn verify_results_contain(&self, keyword: &str) -> Result<()> {
        self.ui
            .log()
            .step(SOURCE, &format!("Verifying all results contain '{keyword}'"));
        let passed = self.products_page.all_products_contain(keyword).await?;
        self.ui.log().assertion(
            SOURCE,
            &format!("All products contain '{keyword}'"),
            passed,
        );
        if passed {
            Ok(())
        } else {
            Err(PommelError::Assertion {
                description: format!("all products contain '{keyword}'"),
                expected: format!("every product name contains '{keyword}'"),
                actual: "at least one name without it".to_string(),
            })
        }
    }

    /// Search for `product_name`, then assert every result carries it.
    pub async fn search_and_verify_results(&self, product_name: &str) -> Result<()> {
        self.ui.log().step(
            SOURCE,
            &format!("Starting search and verify workflow for: {product_name}"),
        );
        self.search_for_product(product_name).await?;
        self.verify_results_contain(product_name).await
    }

    /// Asserts the grid shows exactly `expected` products.
    pub async fn verify_product_count(&self, expected: usize) -> Result<()> {
        self.ui
            .log()
            .step(SOURCE, &format!("Verifying product count equals {expected}"));
        let actual = self.products_page.product_count().await?;
        let passed = actual == expected;
        self.ui.log().assertion(
            SOURCE,
            &format!("Product count is {expected}"),
            passed,
        );
        if passed {
            Ok(())
        } else {
            Err(PommelError::Assertion {
                description: "product count matches".to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use pommel_core::logging::ActionLog;
    use pommel_core::testing::{FakePage, RecordedAction};

    use super::*;

    const SEARCH_INPUT: &str = "input[placeholder='search']";

    fn fixture(page: &FakePage) -> (SearchSteps, ActionLog) {
        let log = ActionLog::new();
        let ix = Interactor::new(
            Arc::new(page.clone()),
            log.clone(),
            "Test",
            Duration::from_secs(1),
        );
        (SearchSteps::new(&ix), log)
    }

    #[tokio::test]
    async fn search_and_verify_passes_on_a_matching_grid() {
        let page = FakePage::new();
        page.show(SEARCH_INPUT);
        page.set_texts("h5.card-title", &["IPHONE 13 PRO", "iphone 12"]);
        let (steps, log) = fixture(&page);

        steps.search_and_verify_results("iphone").await.unwrap();

        let actions = page.actions();
        assert!(actions.contains(&RecordedAction::Fill {
            selector: SEARCH_INPUT.into(),
            text: "iphone".into(),
        }));
        assert!(actions.contains(&RecordedAction::Press {
            selector: SEARCH_INPUT.into(),
            key: "Enter".into(),
        }));
        let steps_records = log.records_from(SOURCE);
        assert_eq!(
            steps_records[0].message,
            "STEP: Starting search and verify workflow for: iphone"
        );
    }

    #[tokio::test]
    async fn search_and_verify_fails_on_stray_results() {
        let page = FakePage::new();
        page.show(SEARCH_INPUT);
        page.set_texts("h5.card-title", &["IPHONE 13 PRO", "ZARA COAT 3"]);
        let (steps, _log) = fixture(&page);

        let err = steps
            .search_and_verify_results("iphone")
            .await
            .unwrap_err();
        assert!(matches!(err, PommelError::Assertion { .. }));
    }
}
