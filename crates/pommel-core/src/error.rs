use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionPhase;

pub type Result<T> = std::result::Result<T, PommelError>;

/// Configuration resolution failure. These abort the run before any test
/// starts; nothing gets launched on a bad configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown environment '{value}' (expected one of: dev, qa, staging, prod)")]
    UnknownEnvironment { value: String },

    #[error("unknown browser '{value}' (expected one of: chromium, firefox, webkit)")]
    UnknownBrowser { value: String },

    #[error("invalid value '{value}' for {field}: expected a non-negative integer")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid value '{value}' for {field}: expected a boolean (1/0, true/false, yes/no, on/off)")]
    InvalidBool { field: &'static str, value: String },

    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

#[derive(Debug, Error)]
pub enum PommelError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("navigation failed: {url}")]
    Navigation {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// An action could not be performed because the target never became
    /// visible and enabled within the interaction timeout.
    #[error("{action} on '{selector}' failed: element not interactable within {timeout_ms}ms")]
    Interaction {
        action: &'static str,
        selector: String,
        timeout_ms: u64,
    },

    #[error("timeout after {ms}ms waiting for: {condition}")]
    Timeout { ms: u64, condition: String },

    /// A checked expectation did not hold. Carries both sides so reports can
    /// show what was expected against what the page actually had.
    #[error("assertion failed: {description} (expected '{expected}', got '{actual}')")]
    Assertion {
        description: String,
        expected: String,
        actual: String,
    },

    #[error("invalid session transition: {from} -> {to}")]
    SessionState { from: SessionPhase, to: SessionPhase },

    #[error("session is not active (phase: {phase})")]
    SessionNotActive { phase: SessionPhase },

    #[error("screenshot failed: {path}")]
    Screenshot {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("browser engine error: {0}")]
    Engine(String),

    #[error("scenario panicked: {0}")]
    Panic(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PommelError {
    /// True for errors that fail the current test but leave the run healthy.
    pub fn is_test_failure(&self) -> bool {
        matches!(
            self,
            PommelError::Interaction { .. }
                | PommelError::Timeout { .. }
                | PommelError::Assertion { .. }
                | PommelError::ElementNotFound { .. }
                | PommelError::Panic(_)
        )
    }
}
