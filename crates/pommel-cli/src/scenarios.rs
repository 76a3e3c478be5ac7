//! The built-in suite: login and search flows of the storefront.

use pommel_core::error::{PommelError, Result};
use pommel_core::runner::{Scenario, ScenarioCx, Suite};

use crate::pages::products::ProductsPage;
use crate::steps::login::LoginSteps;
use crate::steps::search::SearchSteps;

pub fn suite() -> Suite {
    Suite::new(vec![
        Scenario::new(
            "login_valid_credentials_shows_dashboard",
            &["smoke", "login", "critical"],
            login_valid_credentials_shows_dashboard,
        ),
        Scenario::new(
            "login_results_count_matches_cards",
            &["login", "regression"],
            login_results_count_matches_cards,
        ),
        Scenario::new(
            "search_iphone_filters_results",
            &["smoke", "search", "login"],
            search_iphone_filters_results,
        ),
        Scenario::new(
            "search_nonexistent_shows_no_results",
            &["search", "regression"],
            search_nonexistent_shows_no_results,
        ),
    ])
}

async fn login_valid_credentials_shows_dashboard(cx: ScenarioCx) -> Result<()> {
    let login = LoginSteps::new(&cx.interactor);
    let credentials = cx.config.credentials.clone();

    login
        .perform_login(&credentials.username, &credentials.password)
        .await?;
    login.verify_login_success().await?;

    ProductsPage::new(&cx.interactor).wait_until_loaded().await
}

async fn login_results_count_matches_cards(cx: ScenarioCx) -> Result<()> {
    let login = LoginSteps::new(&cx.interactor);
    let credentials = cx.config.credentials.clone();

    login
        .perform_login(&credentials.username, &credentials.password)
        .await?;
    ProductsPage::new(&cx.interactor).wait_until_loaded().await?;

    login.verify_results_count_matches_cards().await
}

async fn search_iphone_filters_results(cx: ScenarioCx) -> Result<()> {
    let login = LoginSteps::new(&cx.interactor);
    let search = SearchSteps::new(&cx.interactor);
    let credentials = cx.config.credentials.clone();

    login
        .perform_login(&credentials.username, &credentials.password)
        .await?;
    login.verify_login_success().await?;

    search.search_for_product("iphone").await?;
    let names = search.product_names().await?;
    if names.is_empty() {
        return Err(PommelError::Assertion {
            description: "search returns at least one product".to_string(),
            expected: "1 or more products".to_string(),
            actual: "0".to_string(),
        });
    }
    search.verify_results_contain("iphone").await
}

async fn search_nonexistent_shows_no_results(cx: ScenarioCx) -> Result<()> {
    let login = LoginSteps::new(&cx.interactor);
    let search = SearchSteps::new(&cx.interactor);
    let credentials = cx.config.credentials.clone();

    login
        .perform_login(&credentials.username, &credentials.password)
        .await?;

    search.search_for_product("xyz123nonexistent").await?;
    search.verify_product_count(0).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_the_storefront_suite() {
        let suite = suite();
        let names: Vec<&str> = suite.scenarios().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "login_valid_credentials_shows_dashboard",
                "login_results_count_matches_cards",
                "search_iphone_filters_results",
                "search_nonexistent_shows_no_results",
            ]
        );
    }

    #[test]
    fn smoke_selection_covers_login_and_search() {
        let suite = suite();
        let smoke = suite.select(&["smoke".to_string()], None);
        assert_eq!(smoke.len(), 2);
        assert!(smoke.iter().all(|s| s.has_tag("smoke")));
    }
}
