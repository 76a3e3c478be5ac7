//! Login workflows.

use pommel_core::error::{PommelError, Result};
use pommel_core::interactor::Interactor;

use crate::pages::login::{LoginPage, DASHBOARD_URL};
use crate::pages::products::ProductsPage;

const SOURCE: &str = "LoginSteps";

pub struct LoginSteps {
    ui: Interactor,
    login_page: LoginPage,
    products_page: ProductsPage,
}

impl LoginSteps {
    pub fn new(interactor: &Interactor) -> Self {
        Self {
            ui: interactor.with_source(SOURCE),
            login_page: LoginPage::new(interactor),
            products_page: ProductsPage::new(interactor),
        }
    }

    /// Log in and wait until the dashboard is up.
    pub async fn perform_login(&self, username: &str, password: &str) -> Result<()> {
        self.ui
            .log()
            .step(SOURCE, &format!("Performing login as {username}"));
        self.login_page.login(username, password).await?;
        self.login_page.wait_for_login_success().await
    }

    /// Asserts the app landed on the dashboard.
    pub async fn verify_login_success(&self) -> Result<()> {
        self.ui.log().step(SOURCE, "Verifying login success");
        self.ui.assert_url(DASHBOARD_URL).await
    }

    /// Count advertised by the results banner; its absence is a failure.
    pub async fn displayed_results_count(&self) -> Result<usize> {
        self.ui
            .log()
            .step(SOURCE, "Reading the displayed results count");
        match self.products_page.results_count().await? {
            Some(count) => Ok(count),
            None => Err(PommelError::Assertion {
                description: "results banner is present".to_string(),
                expected: "Showing <n> results".to_string(),
                actual: "<no banner>".to_string(),
            }),
        }
    }

    /// Asserts the banner count agrees with the number of product cards.
    pub async fn verify_results_count_matches_cards(&self) -> Result<()> {
        self.ui
            .log()
            .step(SOURCE, "Verifying the results banner matches the card count");
        let displayed = self.displayed_results_count().await?;
        let cards = self.products_page.product_count().await?;
        let passed = displayed == cards;
        self.ui.log().assertion(
            SOURCE,
            &format!("Results banner ({displayed}) matches cards ({cards})"),
            passed,
        );
        if passed {
            Ok(())
        } else {
            Err(PommelError::Assertion {
                description: "results banner matches the product card count".to_string(),
                expected: displayed.to_string(),
                actual: cards.to_string(),
            })
        }
    }
}
