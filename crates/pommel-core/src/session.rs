//! Browser session lifecycle around one test.
//!
//! A [`TestSession`] owns the page for exactly one test and walks a fixed
//! phase machine: `NotStarted -> Active -> (Passed | Failed) -> Closed`.
//! Every transition is validated; ending twice or interacting outside
//! `Active` is an error, not a silent no-op. Failure artifacts are captured
//! between the verdict and the close.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::artifacts::{self, Artifact, RunPaths};
use crate::config::RunConfig;
use crate::driver::{BrowserEngine, PageDriver};
use crate::error::{PommelError, Result};
use crate::interactor::Interactor;
use crate::logging::ActionLog;

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Active,
    Failed,
    Passed,
    Closed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::NotStarted => write!(f, "not-started"),
            SessionPhase::Active => write!(f, "active"),
            SessionPhase::Failed => write!(f, "failed"),
            SessionPhase::Passed => write!(f, "passed"),
            SessionPhase::Closed => write!(f, "closed"),
        }
    }
}

/// Verdict a test hands to [`TestSession::end`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    Passed,
    Failed,
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Passed => write!(f, "passed"),
            TestOutcome::Failed => write!(f, "failed"),
        }
    }
}

pub struct TestSession {
    test_id: String,
    config: Arc<RunConfig>,
    engine: Arc<dyn BrowserEngine>,
    log: ActionLog,
    paths: RunPaths,
    phase: SessionPhase,
    driver: Option<Arc<dyn PageDriver>>,
}

impl TestSession {
    pub fn new(
        test_id: &str,
        config: Arc<RunConfig>,
        engine: Arc<dyn BrowserEngine>,
        log: ActionLog,
        paths: RunPaths,
    ) -> Self {
        Self {
            test_id: test_id.to_string(),
            config,
            engine,
            log,
            paths,
            phase: SessionPhase::NotStarted,
            driver: None,
        }
    }

    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Launch the browser and open the configured base URL. The session only
    /// becomes `Active` once both succeed; a failed launch or first
    /// navigation leaves it `NotStarted`.
    pub async fn begin(&mut self) -> Result<()> {
        self.guard(SessionPhase::Active)?;

        let driver: Arc<dyn PageDriver> =
            Arc::from(self.engine.launch(&self.config.launch_options()).await?);

        if let Err(err) = driver.goto(&self.config.base_url).await {
            if let Err(close_err) = driver.close().await {
                warn!("failed to close page after aborted start: {close_err}");
            }
            return Err(err);
        }

        self.log.info(
            "TestSession",
            format!(
                "Started '{}' on {} against {}",
                self.test_id, self.config.browser, self.config.base_url
            ),
        );
        self.driver = Some(driver);
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// Record the verdict, capture failure artifacts and close the page.
    /// Rejects a second call: the verdict of a test is written once.
    pub async fn end(&mut self, outcome: TestOutcome) -> Result<Vec<Artifact>> {
        let verdict = match outcome {
            TestOutcome::Passed => SessionPhase::Passed,
            TestOutcome::Failed => SessionPhase::Failed,
        };
        self.guard(verdict)?;
        self.phase = verdict;

        let mut collected = Vec::new();
        if let Some(driver) = self.driver.take() {
            if outcome == TestOutcome::Failed {
                match artifacts::capture_failure_screenshot(
                    driver.as_ref(),
                    &self.paths,
                    &self.test_id,
                )
                .await
                {
                    Some(shot) => collected.push(shot),
                    None => self.log.warn(
                        "TestSession",
                        format!("No failure screenshot captured for '{}'", self.test_id),
                    ),
                }
                if self.config.video {
                    if let Some(video) =
                        artifacts::collect_video(driver.as_ref(), &self.paths, &self.test_id).await
                    {
                        collected.push(video);
                    }
                }
            }
            // Closing must not overwrite the verdict.
            if let Err(err) = driver.close().await {
                warn!("failed to close browser page: {err}");
            }
        }

        self.log.info(
            "TestSession",
            format!("Finished '{}': {outcome}", self.test_id),
        );
        self.phase = SessionPhase::Closed;
        Ok(collected)
    }

    /// Interactor over the live page, records attributed to `source`.
    pub fn interactor(&self, source: &str) -> Result<Interactor> {
        match (&self.driver, self.phase) {
            (Some(driver), SessionPhase::Active) => Ok(Interactor::new(
                driver.clone(),
                self.log.clone(),
                source,
                self.config.timeout(),
            )),
            _ => Err(PommelError::SessionNotActive { phase: self.phase }),
        }
    }

    /// Validate a transition without performing it.
    fn guard(&self, to: SessionPhase) -> Result<()> {
        let legal = matches!(
            (self.phase, to),
            (SessionPhase::NotStarted, SessionPhase::Active)
                | (SessionPhase::Active, SessionPhase::Failed)
                | (SessionPhase::Active, SessionPhase::Passed)
                | (SessionPhase::Failed, SessionPhase::Closed)
                | (SessionPhase::Passed, SessionPhase::Closed)
        );
        if legal {
            Ok(())
        } else {
            Err(PommelError::SessionState {
                from: self.phase,
                to,
            })
        }
    }
}
