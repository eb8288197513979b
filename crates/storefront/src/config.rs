//! Environment configuration.
//!
//! All settings come from environment variables with fallback defaults. The
//! resolved [`EnvironmentConfig`] is immutable: build it once per run and hand
//! it (usually behind an `Arc`) to every [`crate::PageSession`].
//!
//! Malformed numeric values never fail resolution; the default is used and a
//! `warn` event names the variable and the rejected value.

use crate::wait::SettlePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Default site under test
pub const DEFAULT_BASE_URL: &str = "https://demoqa.com";

/// Default timeout for generic operations (ms)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default navigation timeout (ms)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Default actionability timeout (ms)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 10_000;

/// Default timeout for polling assertions (ms)
pub const DEFAULT_EXPECT_TIMEOUT_MS: u64 = 5_000;

/// Default slow-motion delay between browser actions (ms)
pub const DEFAULT_SLOW_MO_MS: u64 = 1_000;

static GLOBAL: OnceLock<EnvironmentConfig> = OnceLock::new();

/// Test-user credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUser {
    /// Login email
    pub email: String,
    /// Login password
    pub password: String,
}

/// Admin credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// Admin user name
    pub username: String,
    /// Admin password
    pub password: String,
}

/// Seed values used by scenarios
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestData {
    /// Product searched for and added to carts
    pub product_name: String,
    /// Category browsed by catalog scenarios
    pub category: String,
}

/// Browser launch options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserOptions {
    /// Run without a visible window
    pub headless: bool,
    /// Delay inserted before each browser action
    pub slow_mo_ms: u64,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
}

impl BrowserOptions {
    /// Slow-motion delay as a duration
    #[must_use]
    pub const fn slow_mo(&self) -> Duration {
        Duration::from_millis(self.slow_mo_ms)
    }
}

/// Timeout budget, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Generic operation timeout
    pub default_ms: u64,
    /// Page navigation timeout
    pub navigation_ms: u64,
    /// Time an element has to become actionable
    pub action_ms: u64,
    /// Time a polling assertion keeps retrying
    pub expect_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default_ms: DEFAULT_TIMEOUT_MS,
            navigation_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            action_ms: DEFAULT_ACTION_TIMEOUT_MS,
            expect_ms: DEFAULT_EXPECT_TIMEOUT_MS,
        }
    }
}

impl Timeouts {
    /// Navigation timeout as a duration
    #[must_use]
    pub const fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    /// Action timeout as a duration
    #[must_use]
    pub const fn action(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    /// Assertion timeout as a duration
    #[must_use]
    pub const fn expect(&self) -> Duration {
        Duration::from_millis(self.expect_ms)
    }
}

/// Output locations for artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporting {
    /// Raw results consumed by an external report generator
    pub allure_results_dir: PathBuf,
    /// Suite reports and failure captures
    pub test_results_dir: PathBuf,
    /// Named screenshots taken by page objects
    pub screenshot_dir: PathBuf,
}

impl Reporting {
    /// Directory for screenshots captured when a scenario fails
    #[must_use]
    pub fn failure_screenshot_dir(&self) -> PathBuf {
        self.test_results_dir.join("screenshots")
    }

    /// Put every output directory under `root`
    #[must_use]
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            allure_results_dir: root.join("allure-results"),
            test_results_dir: root.join("test-results"),
            screenshot_dir: root.join("screenshots"),
        }
    }
}

/// Fully resolved configuration for one test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    base_url: String,
    test_user: TestUser,
    admin_user: AdminUser,
    test_data: TestData,
    browser: BrowserOptions,
    timeouts: Timeouts,
    settle: SettlePolicy,
    reporting: Reporting,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl EnvironmentConfig {
    /// Resolve from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve using an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        Self {
            base_url: env.string("BASE_URL", DEFAULT_BASE_URL),
            test_user: TestUser {
                email: env.string("TEST_USER_EMAIL", "test@example.com"),
                password: env.string("TEST_USER_PASSWORD", "testpassword123"),
            },
            admin_user: AdminUser {
                username: env.string("ADMIN_USERNAME", "admin"),
                password: env.string("ADMIN_PASSWORD", "admin123"),
            },
            test_data: TestData {
                product_name: env.string("TEST_PRODUCT_NAME", "iPhone"),
                category: env.string("TEST_CATEGORY", "Phones & PDAs"),
            },
            browser: BrowserOptions {
                headless: env.flag("HEADLESS"),
                slow_mo_ms: env.number("SLOW_MO", DEFAULT_SLOW_MO_MS),
                viewport_width: env.number("VIEWPORT_WIDTH", 1280),
                viewport_height: env.number("VIEWPORT_HEIGHT", 720),
            },
            timeouts: Timeouts {
                default_ms: env.number("DEFAULT_TIMEOUT", DEFAULT_TIMEOUT_MS),
                navigation_ms: env.number("NAVIGATION_TIMEOUT", DEFAULT_NAVIGATION_TIMEOUT_MS),
                action_ms: env.number("ACTION_TIMEOUT", DEFAULT_ACTION_TIMEOUT_MS),
                expect_ms: env.number("EXPECT_TIMEOUT", DEFAULT_EXPECT_TIMEOUT_MS),
            },
            settle: SettlePolicy {
                dom_ready_timeout_ms: env.number(
                    "DOM_READY_TIMEOUT",
                    SettlePolicy::DEFAULT_DOM_READY_TIMEOUT_MS,
                ),
                network_idle_timeout_ms: env.number(
                    "NETWORK_IDLE_TIMEOUT",
                    SettlePolicy::DEFAULT_NETWORK_IDLE_TIMEOUT_MS,
                ),
                require_network_idle: env.flag("NETWORK_IDLE_REQUIRED"),
            },
            reporting: Reporting {
                allure_results_dir: env.string("ALLURE_RESULTS_DIR", "allure-results").into(),
                test_results_dir: env.string("TEST_RESULTS_DIR", "test-results").into(),
                screenshot_dir: env.string("SCREENSHOT_DIR", "screenshots").into(),
            },
        }
    }

    /// The process-wide configuration, resolved from the environment on first use.
    ///
    /// Every call returns the same instance.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::from_env)
    }

    /// Site root every page path is resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Regular test user
    #[must_use]
    pub const fn test_user(&self) -> &TestUser {
        &self.test_user
    }

    /// Admin user
    #[must_use]
    pub const fn admin_user(&self) -> &AdminUser {
        &self.admin_user
    }

    /// Scenario seed values
    #[must_use]
    pub const fn test_data(&self) -> &TestData {
        &self.test_data
    }

    /// Browser launch options
    #[must_use]
    pub const fn browser(&self) -> &BrowserOptions {
        &self.browser
    }

    /// Timeout budget
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Best-effort wait policy
    #[must_use]
    pub const fn settle(&self) -> &SettlePolicy {
        &self.settle
    }

    /// Artifact locations
    #[must_use]
    pub const fn reporting(&self) -> &Reporting {
        &self.reporting
    }

    /// Absolute URL for a site path. Absolute URLs are returned unchanged.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Copy with a different base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Copy with different browser options
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserOptions) -> Self {
        self.browser = browser;
        self
    }

    /// Copy with a different timeout budget
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Copy with a different settle policy
    #[must_use]
    pub const fn with_settle(mut self, settle: SettlePolicy) -> Self {
        self.settle = settle;
        self
    }

    /// Copy with different artifact locations
    #[must_use]
    pub fn with_reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = reporting;
        self
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn string(&self, name: &str, default: &str) -> String {
        self.raw(name).unwrap_or_else(|| default.to_string())
    }

    fn flag(&self, name: &str) -> bool {
        self.raw(name).is_some_and(|v| v == "true")
    }

    fn number<T>(&self, name: &str, default: T) -> T
    where
        T: std::str::FromStr + Copy + std::fmt::Display,
    {
        match self.raw(name) {
            None => default,
            Some(value) => value.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    variable = name,
                    value = %value,
                    fallback = %default,
                    "malformed numeric environment value, using default"
                );
                default
            }),
        }
    }
}
