//! Machine-readable run report, written as `results/report.json`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifacts::Artifact;
use crate::config::ConfigSummary;
use crate::error::Result;
use crate::session::TestOutcome;

/// Outcome of one scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub name: String,
    pub tags: Vec<String>,
    pub outcome: TestOutcome,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

/// Everything one run produced: the resolved configuration (password
/// masked), per-scenario results and the tallies.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config: ConfigSummary,
    pub results: Vec<ScenarioResult>,
    pub passed: usize,
    pub failed: usize,
}

impl SuiteReport {
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        config: ConfigSummary,
        results: Vec<ScenarioResult>,
    ) -> Self {
        let passed = results
            .iter()
            .filter(|r| r.outcome == TestOutcome::Passed)
            .count();
        let failed = results.len() - passed;
        Self {
            started_at,
            finished_at,
            config,
            results,
            passed,
            failed,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Serialize into `report.json` under `results_dir`.
    pub fn write(&self, results_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(results_dir)?;
        let path = results_dir.join("report.json");
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!("wrote report {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{self, ConfigOverrides, Defaults, EnvVars};

    fn summary() -> ConfigSummary {
        config::resolve(&ConfigOverrides::default(), &EnvVars::empty(), &Defaults::default())
            .unwrap()
            .summary()
    }

    fn result(name: &str, outcome: TestOutcome, error: Option<&str>) -> ScenarioResult {
        ScenarioResult {
            name: name.to_string(),
            tags: vec!["smoke".to_string()],
            outcome,
            duration_ms: 1234,
            error: error.map(str::to_string),
            artifacts: Vec::new(),
        }
    }

    #[test]
    fn tallies_are_computed_from_results() {
        let now = Utc::now();
        let report = SuiteReport::new(
            now,
            now,
            summary(),
            vec![
                result("login_valid", TestOutcome::Passed, None),
                result("search_iphone", TestOutcome::Passed, None),
                result("search_missing", TestOutcome::Failed, Some("assertion failed")),
            ],
        );

        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn json_shape_is_camel_case_and_sparse() {
        let now = Utc::now();
        let report = SuiteReport::new(
            now,
            now,
            summary(),
            vec![result("login_valid", TestOutcome::Passed, None)],
        );
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"startedAt\""));
        assert!(json.contains("\"durationMs\":1234"));
        assert!(json.contains("\"outcome\":\"passed\""));
        // A passing result with no artifacts omits both optional keys
        assert!(!json.contains("\"error\""));
        assert!(!json.contains("\"artifacts\""));
        assert!(!json.contains("India123#"));
    }

    #[test]
    fn report_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let report = SuiteReport::new(
            now,
            now,
            summary(),
            vec![result("login_valid", TestOutcome::Failed, Some("boom"))],
        );

        let path = report.write(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("report.json"));

        let read: SuiteReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read.failed, 1);
        assert_eq!(read.results[0].error.as_deref(), Some("boom"));
    }
}
