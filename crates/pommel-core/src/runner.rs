//! Scenario suite and the runner that drives sessions through it.
//!
//! A [`Scenario`] is a named, tagged async function over a [`ScenarioCx`].
//! The [`SuiteRunner`] gives each selected scenario a fresh [`TestSession`],
//! turns its `Result` (or panic) into a verdict and keeps going; one failing
//! scenario never takes the suite down.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{error, info, warn};

use crate::artifacts::RunPaths;
use crate::config::RunConfig;
use crate::driver::BrowserEngine;
use crate::error::{PommelError, Result};
use crate::interactor::Interactor;
use crate::logging::ActionLog;
use crate::report::{ScenarioResult, SuiteReport};
use crate::session::{SessionPhase, TestOutcome, TestSession};

/// Everything a scenario body gets to work with.
#[derive(Clone)]
pub struct ScenarioCx {
    pub config: Arc<RunConfig>,
    pub interactor: Interactor,
    pub log: ActionLog,
}

type ScenarioFn = Arc<dyn Fn(ScenarioCx) -> BoxFuture<'static, Result<()>> + Send + Sync>;

#[derive(Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub tags: &'static [&'static str],
    run: ScenarioFn,
}

impl Scenario {
    pub fn new<F, Fut>(name: &'static str, tags: &'static [&'static str], run: F) -> Self
    where
        F: Fn(ScenarioCx) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            name,
            tags,
            run: Arc::new(move |cx| run(cx).boxed()),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Ordered collection of scenarios.
pub struct Suite {
    scenarios: Vec<Scenario>,
}

impl Suite {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Scenarios carrying every requested tag and, when given, `filter` as a
    /// substring of their name.
    pub fn select(&self, tags: &[String], filter: Option<&str>) -> Vec<Scenario> {
        self.scenarios
            .iter()
            .filter(|scenario| {
                tags.iter().all(|tag| scenario.has_tag(tag))
                    && filter.is_none_or(|needle| scenario.name.contains(needle))
            })
            .cloned()
            .collect()
    }
}

pub struct SuiteRunner {
    config: Arc<RunConfig>,
    engine: Arc<dyn BrowserEngine>,
    paths: RunPaths,
}

impl SuiteRunner {
    pub fn new(config: Arc<RunConfig>, engine: Arc<dyn BrowserEngine>, paths: RunPaths) -> Self {
        Self {
            config,
            engine,
            paths,
        }
    }

    /// Run scenarios in order, one fresh session each.
    pub async fn run(&self, scenarios: &[Scenario]) -> SuiteReport {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.run_one(scenario).await);
        }
        SuiteReport::new(started_at, Utc::now(), self.config.summary(), results)
    }

    async fn run_one(&self, scenario: &Scenario) -> ScenarioResult {
        info!("running '{}'", scenario.name);
        let log = ActionLog::new();
        let mut session = TestSession::new(
            scenario.name,
            self.config.clone(),
            self.engine.clone(),
            log.clone(),
            self.paths.clone(),
        );
        let started = Instant::now();

        let run_error = self.drive(scenario, &mut session, &log).await.err();
        let outcome = match run_error {
            None => TestOutcome::Passed,
            Some(_) => TestOutcome::Failed,
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        // When begin() failed there is no session to tear down.
        let artifacts = if session.phase() == SessionPhase::Active {
            match session.end(outcome).await {
                Ok(artifacts) => artifacts,
                Err(err) => {
                    error!("teardown failed for '{}': {err}", scenario.name);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        match &run_error {
            None => info!("'{}' passed in {duration_ms}ms", scenario.name),
            Some(err) if err.is_test_failure() => {
                warn!("'{}' failed in {duration_ms}ms: {err}", scenario.name)
            }
            Some(err) => error!("'{}' errored in {duration_ms}ms: {err}", scenario.name),
        }

        ScenarioResult {
            name: scenario.name.to_string(),
            tags: scenario.tags.iter().map(|t| t.to_string()).collect(),
            outcome,
            duration_ms,
            error: run_error.map(|err| err.to_string()),
            artifacts,
        }
    }

    async fn drive(
        &self,
        scenario: &Scenario,
        session: &mut TestSession,
        log: &ActionLog,
    ) -> Result<()> {
        session.begin().await?;
        let cx = ScenarioCx {
            config: self.config.clone(),
            interactor: session.interactor(scenario.name)?,
            log: log.clone(),
        };
        match AssertUnwindSafe((scenario.run)(cx)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(PommelError::Panic(panic_message(panic.as_ref()))),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
