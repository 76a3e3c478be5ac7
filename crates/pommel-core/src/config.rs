//! Run configuration: typed enums, the precedence chain and the frozen
//! [`RunConfig`].
//!
//! Every configurable field resolves independently as CLI argument >
//! environment variable > built-in default. Resolution happens exactly once
//! per process, before any test starts; the resulting [`RunConfig`] is
//! immutable and handed to collaborators explicitly rather than read from a
//! global.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::driver::LaunchOptions;
use crate::error::ConfigError;

/// Deployment environment a run targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    #[default]
    Qa,
    Staging,
    Prod,
}

impl Environment {
    /// Environment variable that carries this environment's base URL,
    /// e.g. `STAGING_URL`.
    pub fn url_var(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV_URL",
            Environment::Qa => "QA_URL",
            Environment::Staging => "STAGING_URL",
            Environment::Prod => "PROD_URL",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Qa => write!(f, "qa"),
            Environment::Staging => write!(f, "staging"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "qa" => Ok(Environment::Qa),
            "staging" => Ok(Environment::Staging),
            "prod" => Ok(Environment::Prod),
            _ => Err(ConfigError::UnknownEnvironment {
                value: s.to_string(),
            }),
        }
    }
}

/// Browser family to drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Chromium-based browser (Chrome, Edge, Brave)
    #[default]
    Chromium,
    /// Mozilla Firefox
    Firefox,
    /// WebKit (Safari)
    Webkit,
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserKind::Chromium => write!(f, "chromium"),
            BrowserKind::Firefox => write!(f, "firefox"),
            BrowserKind::Webkit => write!(f, "webkit"),
        }
    }
}

impl FromStr for BrowserKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            _ => Err(ConfigError::UnknownBrowser {
                value: s.to_string(),
            }),
        }
    }
}

/// Account used by login flows. `Debug` redacts the password so credentials
/// never reach logs or error chains.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Snapshot of the process environment consulted during resolution.
/// Injected rather than read from `std::env` so precedence is testable
/// without mutating process state.
#[derive(Clone, Debug, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Built-in fallbacks, the lowest rung of the precedence chain.
#[derive(Clone, Debug)]
pub struct Defaults {
    pub environment: Environment,
    pub browser: BrowserKind,
    pub headed: bool,
    pub slow_mo_ms: u64,
    pub timeout_ms: u64,
    pub video: bool,
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            environment: Environment::Qa,
            browser: BrowserKind::Chromium,
            headed: false,
            slow_mo_ms: 0,
            timeout_ms: 30_000,
            video: false,
            base_url: "https://rahulshettyacademy.com/client/#/auth/login".to_string(),
            username: "atulmysuru@gmail.com".to_string(),
            password: "India123#".to_string(),
        }
    }
}

/// Overrides collected from the command line. `None` falls through to the
/// environment variable, then to the built-in default.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub environment: Option<Environment>,
    pub browser: Option<BrowserKind>,
    pub headed: Option<bool>,
    pub slow_mo_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub video: Option<bool>,
    pub base_url: Option<String>,
    pub cdp_endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Immutable snapshot of everything a run needs.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub environment: Environment,
    pub browser: BrowserKind,
    pub headed: bool,
    pub slow_mo_ms: u64,
    pub timeout_ms: u64,
    pub video: bool,
    pub base_url: String,
    pub cdp_endpoint: Option<String>,
    pub credentials: Credentials,
}

impl RunConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Launch parameters for the browser engine.
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            browser: self.browser,
            headed: self.headed,
            slow_mo: Duration::from_millis(self.slow_mo_ms),
            timeout: self.timeout(),
            cdp_endpoint: self.cdp_endpoint.clone(),
        }
    }

    /// Serializable view with the password masked, for reports and the
    /// `config` command.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            environment: self.environment,
            browser: self.browser,
            headed: self.headed,
            slow_mo_ms: self.slow_mo_ms,
            timeout_ms: self.timeout_ms,
            video: self.video,
            base_url: self.base_url.clone(),
            cdp_endpoint: self.cdp_endpoint.clone(),
            username: self.credentials.username.clone(),
            password: "***".to_string(),
        }
    }
}

/// What `RunConfig` looks like on the outside: same fields, password masked.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub environment: Environment,
    pub browser: BrowserKind,
    pub headed: bool,
    pub slow_mo_ms: u64,
    pub timeout_ms: u64,
    pub video: bool,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdp_endpoint: Option<String>,
    pub username: String,
    pub password: String,
}

/// Resolves the run configuration: CLI argument > environment variable >
/// built-in default, independently per field. Environment values are strings
/// and get validated here; the first invalid field aborts resolution.
pub fn resolve(
    overrides: &ConfigOverrides,
    env: &EnvVars,
    defaults: &Defaults,
) -> Result<RunConfig, ConfigError> {
    let environment = resolve_field(overrides.environment, env.get("ENV"), defaults.environment, |raw| {
        raw.parse()
    })?;
    let browser = resolve_field(overrides.browser, env.get("BROWSER"), defaults.browser, |raw| {
        raw.parse()
    })?;
    let headed = resolve_field(overrides.headed, env.get("HEADED"), defaults.headed, |raw| {
        parse_bool("HEADED", raw)
    })?;
    let slow_mo_ms = resolve_field(overrides.slow_mo_ms, env.get("SLOWMO"), defaults.slow_mo_ms, |raw| {
        parse_millis("SLOWMO", raw)
    })?;
    let timeout_ms = resolve_field(overrides.timeout_ms, env.get("TIMEOUT"), defaults.timeout_ms, |raw| {
        parse_millis("TIMEOUT", raw)
    })?;
    let video = resolve_field(overrides.video, env.get("VIDEO"), defaults.video, |raw| {
        parse_bool("VIDEO", raw)
    })?;

    // The URL variable is keyed by the environment that actually resolved,
    // so `--env staging` picks up STAGING_URL.
    let base_url = overrides
        .base_url
        .clone()
        .or_else(|| env.get(environment.url_var()).map(str::to_string))
        .unwrap_or_else(|| defaults.base_url.clone());
    if let Err(err) = Url::parse(&base_url) {
        return Err(ConfigError::InvalidBaseUrl {
            value: base_url,
            reason: err.to_string(),
        });
    }

    let cdp_endpoint = overrides
        .cdp_endpoint
        .clone()
        .or_else(|| env.get("CDP_ENDPOINT").map(str::to_string));

    let credentials = Credentials {
        username: overrides
            .username
            .clone()
            .or_else(|| env.get("DEFAULT_USERNAME").map(str::to_string))
            .unwrap_or_else(|| defaults.username.clone()),
        password: overrides
            .password
            .clone()
            .or_else(|| env.get("DEFAULT_PASSWORD").map(str::to_string))
            .unwrap_or_else(|| defaults.password.clone()),
    };

    Ok(RunConfig {
        environment,
        browser,
        headed,
        slow_mo_ms,
        timeout_ms,
        video,
        base_url,
        cdp_endpoint,
        credentials,
    })
}

fn resolve_field<T>(
    cli: Option<T>,
    env_raw: Option<&str>,
    default: T,
    parse: impl Fn(&str) -> Result<T, ConfigError>,
) -> Result<T, ConfigError> {
    match cli {
        Some(value) => Ok(value),
        None => match env_raw {
            Some(raw) => parse(raw),
            None => Ok(default),
        },
    }
}

fn parse_bool(field: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            field,
            value: raw.to_string(),
        }),
    }
}

fn parse_millis(field: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}
