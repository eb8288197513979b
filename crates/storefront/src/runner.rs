//! Sequential scenario runner and suite report.

use crate::config::EnvironmentConfig;
use crate::result::StorefrontResult;
use crate::scenarios::Scenario;
use crate::session::PageSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::time::Instant;
use uuid::Uuid;

/// File name of the JSON report inside the test results directory
pub const REPORT_FILE_NAME: &str = "report.json";

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Scenario tags
    pub tags: Vec<String>,
    /// Whether the scenario passed
    pub passed: bool,
    /// Error message if failed
    pub error: Option<String>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Screenshot captured on failure
    pub screenshot: Option<PathBuf>,
}

impl ScenarioResult {
    /// Create a passing result
    #[must_use]
    pub fn pass(scenario: &Scenario) -> Self {
        Self {
            name: scenario.name.to_string(),
            tags: scenario.tags.iter().map(ToString::to_string).collect(),
            passed: true,
            error: None,
            duration_ms: 0,
            screenshot: None,
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn fail(scenario: &Scenario, error: impl Into<String>) -> Self {
        Self {
            passed: false,
            error: Some(error.into()),
            ..Self::pass(scenario)
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Attach a failure screenshot
    #[must_use]
    pub fn with_screenshot(mut self, path: Option<PathBuf>) -> Self {
        self.screenshot = path;
        self
    }
}

/// Results of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// Site the run targeted
    pub base_url: String,
    /// When the first scenario started
    pub started_at: DateTime<Utc>,
    /// When the last scenario finished
    pub finished_at: DateTime<Utc>,
    /// Individual results, in run order
    pub results: Vec<ScenarioResult>,
    /// Selected scenarios not run because of fail-fast
    pub skipped: usize,
}

impl SuiteReport {
    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed) && self.skipped == 0
    }

    /// Scenarios that passed
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Scenarios that failed
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Scenarios that ran
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Failed results, in run order
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    /// Total wall time in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        u64::try_from((self.finished_at - self.started_at).num_milliseconds()).unwrap_or(0)
    }

    /// Default report location for a configuration
    #[must_use]
    pub fn default_path(config: &EnvironmentConfig) -> PathBuf {
        config.reporting().test_results_dir.join(REPORT_FILE_NAME)
    }

    /// Write the report as pretty JSON, creating parent directories
    pub fn write_json(&self, path: &Path) -> StorefrontResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }

    /// Read a report written by [`SuiteReport::write_json`]
    pub fn read_json(path: &Path) -> StorefrontResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Runs scenarios one after another against a single session
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    /// Stop after the first failure
    pub fail_fast: bool,
    /// Only scenarios whose name contains this (case-insensitive)
    pub filter: Option<String>,
    /// Only scenarios carrying this tag
    pub tag: Option<String>,
    /// Clear cookies and storage before each scenario
    pub isolate: bool,
}

impl ScenarioRunner {
    /// Runner with isolation on and no selection
    #[must_use]
    pub fn new() -> Self {
        Self {
            isolate: true,
            ..Self::default()
        }
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Restrict the run by name
    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Restrict the run by tag
    #[must_use]
    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    /// Toggle clearing browser state between scenarios
    #[must_use]
    pub const fn with_isolation(mut self, isolate: bool) -> Self {
        self.isolate = isolate;
        self
    }

    /// Whether `scenario` passes the name filter and tag
    #[must_use]
    pub fn selects(&self, scenario: &Scenario) -> bool {
        let name_ok = self.filter.as_deref().map_or(true, |f| {
            scenario.name.to_lowercase().contains(&f.to_lowercase())
        });
        let tag_ok = self.tag.as_deref().map_or(true, |t| scenario.has_tag(t));
        name_ok && tag_ok
    }

    /// Scenarios from `catalog` this runner would run
    #[must_use]
    pub fn select<'a>(&self, catalog: &'a [Scenario]) -> Vec<&'a Scenario> {
        catalog.iter().filter(|s| self.selects(s)).collect()
    }

    /// Run the selected scenarios
    pub async fn run(&self, session: &PageSession, catalog: &[Scenario]) -> SuiteReport {
        self.run_with_observer(session, catalog, |_| {}).await
    }

    /// Run the selected scenarios, reporting each result as it completes
    pub async fn run_with_observer<F>(
        &self,
        session: &PageSession,
        catalog: &[Scenario],
        mut observer: F,
    ) -> SuiteReport
    where
        F: FnMut(&ScenarioResult),
    {
        let selected = self.select(catalog);
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(%run_id, scenarios = selected.len(), "suite started");

        let mut results = Vec::with_capacity(selected.len());
        let mut skipped = 0;
        for (position, scenario) in selected.iter().enumerate() {
            let result = self.run_one(session, scenario).await;
            observer(&result);
            let failed = !result.passed;
            results.push(result);
            if failed && self.fail_fast {
                skipped = selected.len() - position - 1;
                tracing::warn!(skipped, "fail-fast: stopping after first failure");
                break;
            }
        }

        let report = SuiteReport {
            run_id,
            base_url: session.config().base_url().to_string(),
            started_at,
            finished_at: Utc::now(),
            results,
            skipped,
        };
        tracing::info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped,
            "suite finished"
        );
        report
    }

    async fn prepare(&self, session: &PageSession) -> StorefrontResult<()> {
        if self.isolate {
            session.clear_browser_storage().await?;
        }
        Ok(())
    }

    async fn run_one(&self, session: &PageSession, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        tracing::info!(scenario = scenario.name, "scenario started");

        let outcome = match self.prepare(session).await {
            Ok(()) => (scenario.run)(session.clone()).await,
            Err(e) => Err(e),
        };

        let elapsed = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(()) => {
                tracing::info!(scenario = scenario.name, elapsed_ms = elapsed, "scenario passed");
                ScenarioResult::pass(scenario).with_duration_ms(elapsed)
            }
            Err(e) => {
                tracing::warn!(scenario = scenario.name, error = %e, "scenario failed");
                let screenshot = session.capture_failure_screenshot(scenario.name).await;
                ScenarioResult::fail(scenario, e.to_string())
                    .with_duration_ms(elapsed)
                    .with_screenshot(screenshot)
            }
        }
    }
}
