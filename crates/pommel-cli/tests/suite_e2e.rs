//! Drives the real scenario suite end to end over the scripted fake engine.

use std::sync::Arc;

use pommel_cli::scenarios;
use pommel_core::artifacts::RunPaths;
use pommel_core::config::{self, BrowserKind, ConfigOverrides, Defaults, EnvVars};
use pommel_core::driver::BrowserEngine;
use pommel_core::runner::SuiteRunner;
use pommel_core::testing::{FakeEngine, RecordedAction};

const STAGING_LOGIN: &str = "https://staging.shop.example/login";
const STAGING_DASHBOARD: &str = "https://staging.shop.example/dashboard/dash";

/// Fake page scripted like the storefront: a working login form, three
/// product cards and a results banner that agrees with them.
fn scripted_engine() -> Arc<FakeEngine> {
    let engine = Arc::new(FakeEngine::new());
    let page = engine.page();
    page.show("#userEmail");
    page.show("#userPassword");
    page.show("#login");
    page.show("input[placeholder='search']");
    page.on_click_navigate("#login", STAGING_DASHBOARD);
    page.set_text("body", "Showing 3 results |");
    page.set_texts("h5.card-title", &["IPHONE 13 PRO MAX", "iphone X", "IPHONE 12"]);
    page.set_count(".card-body", 3);
    engine
}

fn staging_config(overrides: &ConfigOverrides) -> config::RunConfig {
    let env = EnvVars::empty()
        .set("ENV", "staging")
        .set("STAGING_URL", STAGING_LOGIN);
    config::resolve(overrides, &env, &Defaults::default()).unwrap()
}

#[tokio::test]
async fn critical_login_scenario_passes_on_staging() {
    let tmp = tempfile::tempdir().unwrap();
    let overrides = ConfigOverrides {
        browser: Some(BrowserKind::Firefox),
        ..Default::default()
    };
    let config = staging_config(&overrides);
    assert_eq!(config.base_url, STAGING_LOGIN);

    let engine = scripted_engine();
    let suite = scenarios::suite();
    let selected = suite.select(&["critical".to_string()], None);
    assert_eq!(selected.len(), 1);

    let runner = SuiteRunner::new(
        Arc::new(config),
        engine.clone() as Arc<dyn BrowserEngine>,
        RunPaths::new(tmp.path()),
    );
    let report = runner.run(&selected).await;

    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 0);
    assert!(engine.page().screenshots().is_empty());

    let launches = engine.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].browser, BrowserKind::Firefox);

    let actions = engine.page().actions();
    assert!(actions.contains(&RecordedAction::Goto(STAGING_LOGIN.to_string())));
    assert!(actions.contains(&RecordedAction::Fill {
        selector: "#userEmail".to_string(),
        text: "atulmysuru@gmail.com".to_string(),
    }));
    assert!(actions.contains(&RecordedAction::Click("#login".to_string())));
}

#[tokio::test]
async fn full_suite_isolates_the_failing_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let config = staging_config(&ConfigOverrides::default());

    // Three cards stay on the grid whatever is searched, so the
    // empty-results scenario is the one that fails.
    let engine = scripted_engine();
    let suite = scenarios::suite();

    let runner = SuiteRunner::new(
        Arc::new(config),
        engine.clone() as Arc<dyn BrowserEngine>,
        RunPaths::new(tmp.path()),
    );
    let report = runner.run(suite.scenarios()).await;

    assert_eq!(report.passed, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(engine.page().screenshots().len(), 1);

    let failing = report
        .results
        .iter()
        .find(|r| r.name == "search_nonexistent_shows_no_results")
        .unwrap();
    assert!(failing.error.as_deref().unwrap().contains("assertion failed"));
    assert_eq!(failing.artifacts.len(), 1);
    assert!(report
        .results
        .iter()
        .filter(|r| r.name != failing.name)
        .all(|r| r.artifacts.is_empty()));

    let written = report.write(&RunPaths::new(tmp.path()).results()).unwrap();
    let raw = std::fs::read_to_string(written).unwrap();
    assert!(raw.contains("\"password\": \"***\""));
    assert!(!raw.contains("India123#"));
}
