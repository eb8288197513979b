//! Page session: the interaction primitives every page object shares.
//!
//! A [`PageSession`] pairs a [`BrowserDriver`] with the run's
//! [`EnvironmentConfig`]. Page objects hold a clone and build their actions
//! from these primitives. Actions wait for actionability within the action
//! timeout and fail fast; assertions poll up to the expect timeout.

use crate::config::EnvironmentConfig;
use crate::driver::BrowserDriver;
use crate::locator::Locator;
use crate::result::{StorefrontError, StorefrontResult};
use crate::wait::{poll_until, LoadState, Probe, UrlPattern, WaitOutcome};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Why an element was not ready for interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blocker {
    Missing,
    Hidden,
}

/// Shared browser-interaction capability held by every page object
#[derive(Debug, Clone)]
pub struct PageSession {
    driver: Arc<dyn BrowserDriver>,
    config: Arc<EnvironmentConfig>,
}

impl PageSession {
    /// Create a session over a driver and a resolved configuration
    #[must_use]
    pub fn new(driver: Arc<dyn BrowserDriver>, config: Arc<EnvironmentConfig>) -> Self {
        Self { driver, config }
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn BrowserDriver> {
        &self.driver
    }

    /// The run configuration
    #[must_use]
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Go to a site path and wait for the page to settle
    pub async fn navigate_to(&self, path: &str) -> StorefrontResult<WaitOutcome> {
        let url = self.config.url_for(path);
        tracing::debug!(%url, "navigate");
        self.driver
            .goto(&url, self.config.timeouts().navigation())
            .await?;
        self.wait_for_page_load().await
    }

    /// Go to the site root
    pub async fn navigate_to_home(&self) -> StorefrontResult<WaitOutcome> {
        self.navigate_to("/").await
    }

    /// Wait for DOM readiness, then for network quiescence.
    ///
    /// A DOM-ready timeout always fails. A network-idle timeout is logged and
    /// reported as [`WaitOutcome::ProceededWithoutNetworkIdle`] unless the
    /// settle policy requires network idle.
    pub async fn wait_for_page_load(&self) -> StorefrontResult<WaitOutcome> {
        let settle = *self.config.settle();
        self.driver
            .wait_for_load_state(LoadState::DomContentLoaded, settle.dom_ready_timeout())
            .await?;

        let started = Instant::now();
        match self
            .driver
            .wait_for_load_state(LoadState::NetworkIdle, settle.network_idle_timeout())
            .await
        {
            Ok(()) => Ok(WaitOutcome::Settled),
            Err(e) if e.is_timeout() && !settle.require_network_idle => {
                let waited_ms = started.elapsed().as_millis() as u64;
                tracing::warn!(
                    waited_ms,
                    budget_ms = settle.network_idle_timeout_ms,
                    "network did not go idle, proceeding"
                );
                Ok(WaitOutcome::ProceededWithoutNetworkIdle { waited_ms })
            }
            Err(e) => Err(e),
        }
    }

    /// Reload and settle
    pub async fn reload(&self) -> StorefrontResult<WaitOutcome> {
        self.driver
            .reload(self.config.timeouts().navigation())
            .await?;
        self.wait_for_page_load().await
    }

    /// Poll the current URL until it matches, within the navigation timeout
    pub async fn wait_for_url(&self, pattern: &UrlPattern) -> StorefrontResult<String> {
        let timeout = self.config.timeouts().navigation();
        let driver = self.driver.as_ref();
        let outcome = poll_until(timeout, move || async move {
            let url = driver.current_url().await?;
            Ok(if pattern.matches(&url) {
                Probe::Done(url)
            } else {
                Probe::Retry(url)
            })
        })
        .await?;
        match outcome {
            Probe::Done(url) => Ok(url),
            Probe::Retry(_) => Err(StorefrontError::timeout(
                format!("URL matching {pattern}"),
                timeout.as_millis() as u64,
            )),
        }
    }

    /// Current URL
    pub async fn current_url(&self) -> StorefrontResult<String> {
        self.driver.current_url().await
    }

    /// Document title
    pub async fn title(&self) -> StorefrontResult<String> {
        self.driver.title().await
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Click once the element is visible
    pub async fn click_element(&self, locator: &Locator) -> StorefrontResult<()> {
        self.wait_actionable(locator, true).await?;
        tracing::debug!(locator = %locator, "click");
        self.driver.click(locator).await
    }

    /// Replace an input's value once it is visible
    pub async fn fill_input(&self, locator: &Locator, value: &str) -> StorefrontResult<()> {
        self.wait_actionable(locator, true).await?;
        tracing::debug!(locator = %locator, "fill");
        self.driver.fill(locator, value).await
    }

    /// Empty an input
    pub async fn clear_input(&self, locator: &Locator) -> StorefrontResult<()> {
        self.fill_input(locator, "").await
    }

    /// Choose an option of a `<select>` by value or label
    pub async fn select_option(&self, locator: &Locator, value: &str) -> StorefrontResult<()> {
        self.wait_actionable(locator, true).await?;
        tracing::debug!(locator = %locator, value, "select option");
        self.driver.select_option(locator, value).await
    }

    /// Tick a checkbox or radio button.
    ///
    /// Only attachment is awaited: styled controls often hide the native input.
    pub async fn check_element(&self, locator: &Locator) -> StorefrontResult<()> {
        self.wait_actionable(locator, false).await?;
        tracing::debug!(locator = %locator, "check");
        self.driver.set_checked(locator, true).await
    }

    /// Untick a checkbox
    pub async fn uncheck_element(&self, locator: &Locator) -> StorefrontResult<()> {
        self.wait_actionable(locator, false).await?;
        tracing::debug!(locator = %locator, "uncheck");
        self.driver.set_checked(locator, false).await
    }

    async fn wait_actionable(&self, locator: &Locator, require_visible: bool) -> StorefrontResult<()> {
        let timeout = self.config.timeouts().action();
        let driver = self.driver.as_ref();
        let outcome = poll_until(timeout, move || async move {
            if driver.count(locator).await? == 0 {
                return Ok(Probe::Retry(Blocker::Missing));
            }
            if require_visible && !driver.is_visible(locator).await? {
                return Ok(Probe::Retry(Blocker::Hidden));
            }
            Ok(Probe::Done(()))
        })
        .await?;
        match outcome {
            Probe::Done(()) => Ok(()),
            Probe::Retry(Blocker::Missing) => Err(StorefrontError::ElementNotFound {
                selector: locator.key(),
            }),
            Probe::Retry(Blocker::Hidden) => Err(StorefrontError::NotActionable {
                selector: locator.key(),
                reason: format!("not visible after {}ms", timeout.as_millis()),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Text content; `""` when the element has none
    pub async fn get_text(&self, locator: &Locator) -> StorefrontResult<String> {
        Ok(self.driver.text_content(locator).await?.unwrap_or_default())
    }

    /// Attribute value
    pub async fn get_attribute(
        &self,
        locator: &Locator,
        name: &str,
    ) -> StorefrontResult<Option<String>> {
        self.driver.attribute(locator, name).await
    }

    /// Current value of a form control
    pub async fn input_value(&self, locator: &Locator) -> StorefrontResult<String> {
        self.driver.input_value(locator).await
    }

    /// Whether a checkbox or radio button is checked
    pub async fn is_checked(&self, locator: &Locator) -> StorefrontResult<bool> {
        self.driver.is_checked(locator).await
    }

    /// Number of matching elements
    pub async fn count(&self, locator: &Locator) -> StorefrontResult<usize> {
        self.driver.count(locator).await
    }

    /// Whether the element is visible right now; driver errors read as `false`
    pub async fn is_element_visible(&self, locator: &Locator) -> bool {
        match self.driver.is_visible(locator).await {
            Ok(visible) => visible,
            Err(e) => {
                tracing::debug!(locator = %locator, error = %e, "visibility probe failed");
                false
            }
        }
    }

    /// Whole-page text
    pub async fn page_text(&self) -> StorefrontResult<String> {
        self.get_text(&Locator::new("body")).await
    }

    /// Run a script in the page
    pub async fn evaluate(&self, script: &str) -> StorefrontResult<serde_json::Value> {
        self.driver.evaluate(script).await
    }

    // ------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------

    /// Element becomes visible within the expect timeout
    pub async fn assert_element_visible(&self, locator: &Locator) -> StorefrontResult<()> {
        let driver = self.driver.as_ref();
        self.expect(&format!("{locator} to be visible"), move || async move {
            let visible = driver.is_visible(locator).await?;
            Ok((visible, if visible { "visible" } else { "hidden" }.to_string()))
        })
        .await
    }

    /// At least one of the elements becomes visible within the expect timeout
    pub async fn assert_any_element_visible(&self, locators: &[&Locator]) -> StorefrontResult<()> {
        let driver = self.driver.as_ref();
        let names = locators
            .iter()
            .map(|l| l.key())
            .collect::<Vec<_>>()
            .join(" | ");
        self.expect(&format!("one of [{names}] to be visible"), move || async move {
            for locator in locators {
                if driver.is_visible(locator).await? {
                    return Ok((true, locator.key()));
                }
            }
            Ok((false, "none visible".to_string()))
        })
        .await
    }

    /// Element is hidden or absent within the expect timeout
    pub async fn assert_element_hidden(&self, locator: &Locator) -> StorefrontResult<()> {
        let driver = self.driver.as_ref();
        self.expect(&format!("{locator} to be hidden"), move || async move {
            let visible = driver.is_visible(locator).await?;
            Ok((!visible, if visible { "visible" } else { "hidden" }.to_string()))
        })
        .await
    }

    /// Element text contains `expected`
    pub async fn assert_text_content(&self, locator: &Locator, expected: &str) -> StorefrontResult<()> {
        let driver = self.driver.as_ref();
        self.expect(&format!("{locator} to contain text {expected:?}"), move || async move {
            Ok(match missing_as_none(driver.text_content(locator).await)? {
                Some(text) => {
                    let text = text.unwrap_or_default();
                    (text.contains(expected), format!("{text:?}"))
                }
                None => (false, "no element".to_string()),
            })
        })
        .await
    }

    /// Attribute matches a regular expression
    pub async fn assert_attribute_matches(
        &self,
        locator: &Locator,
        name: &str,
        pattern: &str,
    ) -> StorefrontResult<()> {
        let re = regex::Regex::new(pattern)
            .map_err(|e| StorefrontError::invalid_argument(format!("bad pattern {pattern:?}: {e}")))?;
        let re = &re;
        let driver = self.driver.as_ref();
        self.expect(
            &format!("{locator} attribute {name} to match /{pattern}/"),
            move || async move {
                Ok(match missing_as_none(driver.attribute(locator, name).await)? {
                    Some(Some(value)) => (re.is_match(&value), format!("{value:?}")),
                    Some(None) => (false, "attribute absent".to_string()),
                    None => (false, "no element".to_string()),
                })
            },
        )
        .await
    }

    /// Form control value equals `expected`
    pub async fn assert_input_value(&self, locator: &Locator, expected: &str) -> StorefrontResult<()> {
        let driver = self.driver.as_ref();
        self.expect(&format!("{locator} to have value {expected:?}"), move || async move {
            Ok(match missing_as_none(driver.input_value(locator).await)? {
                Some(value) => (value == expected, format!("{value:?}")),
                None => (false, "no element".to_string()),
            })
        })
        .await
    }

    /// Current URL matches `pattern`
    pub async fn assert_url(&self, pattern: &UrlPattern) -> StorefrontResult<()> {
        let driver = self.driver.as_ref();
        self.expect(&format!("URL to match {pattern}"), move || async move {
            let url = driver.current_url().await?;
            Ok((pattern.matches(&url), url))
        })
        .await
    }

    /// Document title equals `expected`
    pub async fn assert_title(&self, expected: &str) -> StorefrontResult<()> {
        let driver = self.driver.as_ref();
        self.expect(&format!("title to be {expected:?}"), move || async move {
            let title = driver.title().await?;
            Ok((title == expected, format!("{title:?}")))
        })
        .await
    }

    async fn expect<F, Fut>(&self, expectation: &str, probe: F) -> StorefrontResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StorefrontResult<(bool, String)>>,
    {
        let mut probe = probe;
        let outcome = poll_until(self.config.timeouts().expect(), move || {
            let next = probe();
            async move {
                let (ok, actual) = next.await?;
                Ok(if ok { Probe::Done(()) } else { Probe::Retry(actual) })
            }
        })
        .await?;
        match outcome {
            Probe::Done(()) => Ok(()),
            Probe::Retry(actual) => Err(StorefrontError::assertion(format!(
                "expected {expectation}, actual {actual}"
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Artifacts and browser state
    // ------------------------------------------------------------------

    /// Full-page screenshot written to `<screenshot_dir>/<name>.png`
    pub async fn take_screenshot(&self, name: &str) -> StorefrontResult<PathBuf> {
        let dir = self.config.reporting().screenshot_dir.clone();
        let path = dir.join(format!("{name}.png"));
        self.write_screenshot(dir, path).await
    }

    /// Screenshot for a failed test, named `failure-<name>-<ms>.png` under
    /// `<test_results_dir>/screenshots`. Errors are logged, never returned.
    pub async fn capture_failure_screenshot(&self, test_name: &str) -> Option<PathBuf> {
        let dir = self.config.reporting().failure_screenshot_dir();
        let stamp = chrono::Utc::now().timestamp_millis();
        let path = dir.join(format!("failure-{}-{stamp}.png", sanitize_file_stem(test_name)));
        match self.write_screenshot(dir, path).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "failure screenshot saved");
                Some(path)
            }
            Err(e) => {
                tracing::error!(test = test_name, error = %e, "failed to capture failure screenshot");
                None
            }
        }
    }

    async fn write_screenshot(&self, dir: PathBuf, path: PathBuf) -> StorefrontResult<PathBuf> {
        let bytes = self.driver.screenshot(true).await?;
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Clear cookies and web storage
    pub async fn clear_browser_storage(&self) -> StorefrontResult<()> {
        self.driver.clear_storage().await
    }

    /// Resize the viewport
    pub async fn set_viewport(&self, width: u32, height: u32) -> StorefrontResult<()> {
        self.driver.set_viewport(width, height).await
    }

    /// Auto-accept browser dialogs
    pub async fn accept_dialogs(&self) -> StorefrontResult<()> {
        self.driver.accept_dialogs().await
    }

    /// Sleep for a fixed interval
    pub async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// `ElementNotFound` becomes `None`; other errors propagate
fn missing_as_none<T>(result: StorefrontResult<T>) -> StorefrontResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StorefrontError::ElementNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// File-name-safe form of a test or product name
pub(crate) fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{Reporting, Timeouts};
    use crate::driver::{MockDriver, MockElement};
    use crate::wait::SettlePolicy;

    fn fast_config() -> EnvironmentConfig {
        EnvironmentConfig::from_lookup(|_| None)
            .with_base_url("https://shop.test")
            .with_timeouts(Timeouts {
                default_ms: 200,
                navigation_ms: 200,
                action_ms: 150,
                expect_ms: 150,
            })
            .with_settle(SettlePolicy {
                dom_ready_timeout_ms: 100,
                network_idle_timeout_ms: 100,
                require_network_idle: false,
            })
    }

    fn session_with(config: EnvironmentConfig) -> (Arc<MockDriver>, PageSession) {
        let driver = Arc::new(MockDriver::new());
        let session = PageSession::new(driver.clone(), Arc::new(config));
        (driver, session)
    }

    fn session() -> (Arc<MockDriver>, PageSession) {
        session_with(fast_config())
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigate_joins_base_url() {
            let (driver, session) = session();
            let outcome = session.navigate_to("/index.php?route=account/login").await.unwrap();
            assert!(outcome.is_settled());
            assert_eq!(driver.url(), "https://shop.test/index.php?route=account/login");
            assert!(driver.was_called("wait_for_load_state:DOMContentLoaded"));
            assert!(driver.was_called("wait_for_load_state:networkidle"));
        }

        #[tokio::test]
        async fn test_network_idle_timeout_proceeds_by_default() {
            let (driver, session) = session();
            driver.set_network_idle(false);
            let outcome = session.navigate_to_home().await.unwrap();
            assert!(matches!(
                outcome,
                WaitOutcome::ProceededWithoutNetworkIdle { .. }
            ));
        }

        #[tokio::test]
        async fn test_network_idle_required_propagates() {
            let config = fast_config().with_settle(SettlePolicy {
                dom_ready_timeout_ms: 100,
                network_idle_timeout_ms: 50,
                require_network_idle: true,
            });
            let (driver, session) = session_with(config);
            driver.set_network_idle(false);
            let err = session.navigate_to_home().await.unwrap_err();
            assert!(err.is_timeout());
        }

        #[tokio::test]
        async fn test_dom_ready_timeout_always_fails() {
            let (driver, session) = session();
            driver.set_dom_ready(false);
            let err = session.wait_for_page_load().await.unwrap_err();
            assert!(err.to_string().contains("DOMContentLoaded"));
        }

        #[tokio::test]
        async fn test_wait_for_url() {
            let (driver, session) = session();
            driver.with_page(|page| page.set_url("https://shop.test/index.php?route=account/account"));
            let url = session
                .wait_for_url(&UrlPattern::regex(".*account.*").unwrap())
                .await
                .unwrap();
            assert!(url.contains("account"));
            let err = session
                .wait_for_url(&UrlPattern::Contains("success".into()))
                .await
                .unwrap_err();
            assert!(err.is_timeout());
        }
    }

    mod action_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_missing_element_fails_after_action_timeout() {
            let (_driver, session) = session();
            let err = session.click_element(&Locator::new("#missing")).await.unwrap_err();
            assert!(matches!(err, StorefrontError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_click_hidden_element_not_actionable() {
            let (driver, session) = session();
            let button = Locator::new("#button-cart");
            driver.set_element(&button, MockElement::new().hidden());
            let err = session.click_element(&button).await.unwrap_err();
            assert!(matches!(err, StorefrontError::NotActionable { .. }));
            assert!(!driver.was_called("click:"));
        }

        #[tokio::test]
        async fn test_fill_and_clear() {
            let (driver, session) = session();
            let email = Locator::new("#input-email");
            driver.set_element(&email, MockElement::new());
            session.fill_input(&email, "x@y.test").await.unwrap();
            assert_eq!(session.input_value(&email).await.unwrap(), "x@y.test");
            session.clear_input(&email).await.unwrap();
            assert_eq!(session.input_value(&email).await.unwrap(), "");
        }

        #[tokio::test]
        async fn test_check_hidden_radio() {
            let (driver, session) = session();
            let radio = Locator::new(r#"input[name="gender"][value="Male"]"#);
            driver.set_element(&radio, MockElement::new().hidden());
            session.check_element(&radio).await.unwrap();
            assert!(session.is_checked(&radio).await.unwrap());
        }

        #[tokio::test]
        async fn test_action_waits_for_late_element() {
            let (driver, session) = session();
            let late = Locator::new("#late");
            let d = driver.clone();
            let l = late.clone();
            let appear = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                d.set_element(&l, MockElement::new());
            });
            session.click_element(&late).await.unwrap();
            appear.await.unwrap();
        }
    }

    mod query_tests {
        use super::*;

        #[tokio::test]
        async fn test_get_text_empty_when_no_text() {
            let (driver, session) = session();
            let total = Locator::new("#cart-total");
            driver.set_element(&total, MockElement::new());
            assert_eq!(session.get_text(&total).await.unwrap(), "");
        }

        #[tokio::test]
        async fn test_visibility_probe_never_fails() {
            let (_driver, session) = session();
            assert!(!session.is_element_visible(&Locator::new("#nothing")).await);
        }

        #[tokio::test]
        async fn test_attribute_and_count() {
            let (driver, session) = session();
            let qty = Locator::new(r#"td input[type="text"]"#);
            driver.set_elements(
                &qty,
                vec![
                    MockElement::new().with_attribute("value", "1"),
                    MockElement::new().with_attribute("value", "3"),
                ],
            );
            assert_eq!(session.count(&qty).await.unwrap(), 2);
            assert_eq!(
                session.get_attribute(&qty.nth(1), "value").await.unwrap().as_deref(),
                Some("3")
            );
        }
    }

    mod assertion_tests {
        use super::*;

        #[tokio::test]
        async fn test_assert_text_content_reports_actual() {
            let (driver, session) = session();
            let alert = Locator::new(".alert-success");
            driver.set_element(&alert, MockElement::text("Success: added"));
            session.assert_text_content(&alert, "Success").await.unwrap();
            let err = session.assert_text_content(&alert, "Warning").await.unwrap_err();
            assert!(err.is_assertion());
            assert!(err.to_string().contains("Success: added"));
        }

        #[tokio::test]
        async fn test_assert_visible_and_hidden() {
            let (driver, session) = session();
            let modal = Locator::new(".modal-content");
            session.assert_element_hidden(&modal).await.unwrap();
            driver.set_element(&modal, MockElement::new());
            session.assert_element_visible(&modal).await.unwrap();
            assert!(session.assert_element_hidden(&modal).await.unwrap_err().is_assertion());
        }

        #[tokio::test]
        async fn test_assert_attribute_matches() {
            let (driver, session) = session();
            let link = Locator::new("#logo a");
            driver.set_element(&link, MockElement::new().with_attribute("href", "/index.php?route=common/home"));
            session.assert_attribute_matches(&link, "href", "common/home").await.unwrap();
            assert!(session
                .assert_attribute_matches(&link, "href", "[bad")
                .await
                .is_err());
        }

        #[tokio::test]
        async fn test_assert_input_value_url_title() {
            let (driver, session) = session();
            let name = Locator::new("#input-name");
            driver.set_element(&name, MockElement::new().with_value("Ann"));
            driver.with_page(|page| {
                page.set_url("https://shop.test/");
                page.set_title("Your Store");
            });
            session.assert_input_value(&name, "Ann").await.unwrap();
            session.assert_url(&UrlPattern::Contains("shop.test".into())).await.unwrap();
            session.assert_title("Your Store").await.unwrap();
            assert!(session.assert_title("Other").await.unwrap_err().is_assertion());
        }
    }

    mod artifact_tests {
        use super::*;

        #[tokio::test]
        async fn test_take_screenshot_writes_png() {
            let dir = tempfile::tempdir().unwrap();
            let config = fast_config().with_reporting(Reporting::rooted_at(dir.path()));
            let (_driver, session) = session_with(config);
            let path = session.take_screenshot("home").await.unwrap();
            assert_eq!(path, dir.path().join("screenshots").join("home.png"));
            let bytes = std::fs::read(&path).unwrap();
            assert!(bytes.starts_with(crate::driver::PNG_SIGNATURE));
        }

        #[tokio::test]
        async fn test_failure_screenshot_naming() {
            let dir = tempfile::tempdir().unwrap();
            let config = fast_config().with_reporting(Reporting::rooted_at(dir.path()));
            let (_driver, session) = session_with(config);
            let path = session.capture_failure_screenshot("cart: add item").await.unwrap();
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("failure-cart--add-item-"));
            assert!(path.starts_with(dir.path().join("test-results").join("screenshots")));
        }

        #[tokio::test]
        async fn test_failure_screenshot_swallows_errors() {
            let dir = tempfile::tempdir().unwrap();
            let config = fast_config().with_reporting(Reporting::rooted_at(dir.path()));
            let (driver, session) = session_with(config);
            driver.set_screenshot(Vec::new());
            assert!(session.capture_failure_screenshot("broken").await.is_none());
        }

        #[tokio::test]
        async fn test_browser_state_helpers() {
            let (driver, session) = session();
            session.clear_browser_storage().await.unwrap();
            session.set_viewport(1024, 768).await.unwrap();
            session.accept_dialogs().await.unwrap();
            assert!(driver.was_called("clear_storage"));
            assert_eq!(driver.viewport(), Some((1024, 768)));
            assert!(driver.dialogs_accepted());
        }
    }
}
