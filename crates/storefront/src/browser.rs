//! Chromium control through the Chrome DevTools Protocol.
//!
//! [`LaunchOptions`] is always available. [`ChromiumDriver`] needs the
//! `browser` feature and implements [`crate::BrowserDriver`] with
//! chromiumoxide. Element operations run as page-context scripts built from
//! [`crate::Locator::to_resolver_js`], so every call re-resolves the locator.

use crate::config::BrowserOptions;
use std::time::Duration;

/// How to launch Chromium
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Run without a visible window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Delay before each action
    pub slow_mo: Duration,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            slow_mo: Duration::ZERO,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl From<&BrowserOptions> for LaunchOptions {
    fn from(options: &BrowserOptions) -> Self {
        Self {
            headless: options.headless,
            viewport_width: options.viewport_width,
            viewport_height: options.viewport_height,
            slow_mo: options.slow_mo(),
            ..Self::default()
        }
    }
}

impl LaunchOptions {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the slow-motion delay
    #[must_use]
    pub const fn with_slow_mo(mut self, slow_mo: Duration) -> Self {
        self.slow_mo = slow_mo;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Page-context script: `true` when `el` is rendered and not hidden
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
const VISIBLE_JS: &str = "(!!(el.offsetWidth || el.offsetHeight || el.getClientRects().length) \
     && getComputedStyle(el).visibility !== 'hidden')";

/// Page-context script: resources finished since the document started.
///
/// Counts through a `PerformanceObserver`, which keeps receiving entries
/// after the resource timing buffer (250 entries by default) is full. The
/// buffer limit is raised too.
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
const RESOURCE_COUNT_JS: &str = "(() => { \
     if (window.__storefrontResources === undefined) { \
       window.__storefrontResources = 0; \
       performance.setResourceTimingBufferSize(100000); \
       new PerformanceObserver((list) => { \
         window.__storefrontResources += list.getEntries().length; \
       }).observe({ type: 'resource', buffered: true }); \
     } \
     return window.__storefrontResources; })()";

/// Wrap `body` so it runs with `el` bound to the locator's first match.
///
/// The script evaluates to `{ found: false }` or `{ found: true, value }`.
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn first_match_script(locator: &crate::Locator, body: &str) -> String {
    format!(
        "(() => {{ const el = {}[0]; if (!el) return {{ found: false }}; \
         const value = ((el) => {{ {body} }})(el); \
         return {{ found: true, value: value === undefined ? null : value }}; }})()",
        locator.to_resolver_js()
    )
}

#[cfg(feature = "browser")]
#[allow(clippy::items_after_statements, clippy::cast_possible_wrap)]
mod cdp {
    use super::{first_match_script, LaunchOptions, RESOURCE_COUNT_JS, VISIBLE_JS};
    use crate::driver::BrowserDriver;
    use crate::locator::{js_string, Locator};
    use crate::result::{StorefrontError, StorefrontResult};
    use crate::wait::{LoadState, NETWORK_IDLE_THRESHOLD_MS};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
    use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
    use chromiumoxide::cdp::browser_protocol::page::{
        AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tokio::time::Instant;

    const POLL: Duration = Duration::from_millis(crate::wait::DEFAULT_POLL_INTERVAL_MS);

    const ACCEPT_DIALOGS_JS: &str = "window.alert = () => {}; \
         window.confirm = () => true; \
         window.prompt = (_m, d) => (d === undefined ? '' : d);";

    fn driver_err(e: impl std::fmt::Display) -> StorefrontError {
        StorefrontError::driver(e.to_string())
    }

    fn script_err(e: impl std::fmt::Display) -> StorefrontError {
        StorefrontError::Script {
            message: e.to_string(),
        }
    }

    /// Browser driver with a real CDP connection
    #[derive(Debug)]
    pub struct ChromiumDriver {
        browser: Arc<Mutex<CdpBrowser>>,
        page: Arc<Mutex<CdpPage>>,
        options: LaunchOptions,
        handle: tokio::task::JoinHandle<()>,
    }

    impl ChromiumDriver {
        /// Launch Chromium and open a blank page
        pub async fn launch(options: LaunchOptions) -> StorefrontResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(options.viewport_width, options.viewport_height);

            if !options.headless {
                builder = builder.with_head();
            }

            if !options.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = options.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| StorefrontError::BrowserLaunch { message: e })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| StorefrontError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| StorefrontError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            tracing::info!(
                headless = options.headless,
                width = options.viewport_width,
                height = options.viewport_height,
                "chromium launched"
            );

            let driver = Self {
                browser: Arc::new(Mutex::new(browser)),
                page: Arc::new(Mutex::new(page)),
                options,
                handle,
            };
            driver
                .set_viewport(driver.options.viewport_width, driver.options.viewport_height)
                .await?;
            Ok(driver)
        }

        /// Options the browser was launched with
        #[must_use]
        pub const fn options(&self) -> &LaunchOptions {
            &self.options
        }

        async fn slow_mo(&self) {
            if !self.options.slow_mo.is_zero() {
                tokio::time::sleep(self.options.slow_mo).await;
            }
        }

        async fn eval(&self, script: &str) -> StorefrontResult<Value> {
            let page = self.page.lock().await;
            let result = page.evaluate(script).await.map_err(script_err)?;
            Ok(result.value().cloned().unwrap_or(Value::Null))
        }

        /// Run `body` against the first match; `ElementNotFound` when nothing matches
        async fn on_first(&self, locator: &Locator, body: &str) -> StorefrontResult<Value> {
            let result = self.eval(&first_match_script(locator, body)).await?;
            if result.get("found").and_then(Value::as_bool) != Some(true) {
                return Err(StorefrontError::ElementNotFound {
                    selector: locator.key(),
                });
            }
            Ok(result.get("value").cloned().unwrap_or(Value::Null))
        }

        /// Run an action script that answers `"ok"` or a refusal reason
        async fn act(&self, locator: &Locator, body: &str) -> StorefrontResult<()> {
            self.slow_mo().await;
            match self.on_first(locator, body).await? {
                Value::String(s) if s == "ok" => Ok(()),
                other => Err(StorefrontError::NotActionable {
                    selector: locator.key(),
                    reason: other.as_str().unwrap_or("refused").to_string(),
                }),
            }
        }

        async fn ready_state(&self) -> StorefrontResult<String> {
            Ok(self
                .eval("document.readyState")
                .await?
                .as_str()
                .unwrap_or_default()
                .to_string())
        }

        async fn wait_ready_state(&self, accept: &[&str], timeout: Duration) -> StorefrontResult<bool> {
            let deadline = Instant::now() + timeout;
            loop {
                if accept.contains(&self.ready_state().await?.as_str()) {
                    return Ok(true);
                }
                if Instant::now() >= deadline {
                    return Ok(false);
                }
                tokio::time::sleep(POLL).await;
            }
        }

        /// Resource-entry count unchanged for the idle threshold
        async fn wait_network_idle(&self, timeout: Duration) -> StorefrontResult<bool> {
            let deadline = Instant::now() + timeout;
            let threshold = Duration::from_millis(NETWORK_IDLE_THRESHOLD_MS);
            let mut last_count = None;
            let mut quiet_since = Instant::now();
            loop {
                let count = self.eval(RESOURCE_COUNT_JS).await?.as_u64();
                if count != last_count {
                    last_count = count;
                    quiet_since = Instant::now();
                } else if quiet_since.elapsed() >= threshold {
                    return Ok(true);
                }
                if Instant::now() >= deadline {
                    return Ok(false);
                }
                tokio::time::sleep(POLL).await;
            }
        }
    }

    #[async_trait]
    impl BrowserDriver for ChromiumDriver {
        async fn goto(&self, url: &str, timeout: Duration) -> StorefrontResult<()> {
            self.slow_mo().await;
            tracing::debug!(url, "goto");
            let page = self.page.lock().await;
            match tokio::time::timeout(timeout, page.goto(url)).await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(StorefrontError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                }),
                Err(_) => Err(StorefrontError::timeout(
                    format!("navigation to {url}"),
                    timeout.as_millis() as u64,
                )),
            }
        }

        async fn wait_for_load_state(
            &self,
            state: LoadState,
            timeout: Duration,
        ) -> StorefrontResult<()> {
            let reached = match state {
                LoadState::DomContentLoaded => {
                    self.wait_ready_state(&["interactive", "complete"], timeout)
                        .await?
                }
                LoadState::Load => self.wait_ready_state(&["complete"], timeout).await?,
                LoadState::NetworkIdle => self.wait_network_idle(timeout).await?,
            };
            if reached {
                Ok(())
            } else {
                Err(StorefrontError::timeout(
                    state.event_name(),
                    timeout.as_millis() as u64,
                ))
            }
        }

        async fn current_url(&self) -> StorefrontResult<String> {
            let page = self.page.lock().await;
            Ok(page.url().await.map_err(driver_err)?.unwrap_or_default())
        }

        async fn title(&self) -> StorefrontResult<String> {
            let page = self.page.lock().await;
            Ok(page.get_title().await.map_err(driver_err)?.unwrap_or_default())
        }

        async fn reload(&self, timeout: Duration) -> StorefrontResult<()> {
            let page = self.page.lock().await;
            match tokio::time::timeout(timeout, page.reload()).await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(driver_err(e)),
                Err(_) => Err(StorefrontError::timeout("reload", timeout.as_millis() as u64)),
            }
        }

        async fn count(&self, locator: &Locator) -> StorefrontResult<usize> {
            let script = format!("{}.length", locator.to_resolver_js());
            Ok(self.eval(&script).await?.as_u64().unwrap_or(0) as usize)
        }

        async fn is_visible(&self, locator: &Locator) -> StorefrontResult<bool> {
            let body = format!("return {VISIBLE_JS};");
            match self.on_first(locator, &body).await {
                Ok(value) => Ok(value.as_bool().unwrap_or(false)),
                Err(StorefrontError::ElementNotFound { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        }

        async fn click(&self, locator: &Locator) -> StorefrontResult<()> {
            tracing::debug!(locator = %locator, "click");
            let body = format!(
                "if (!{VISIBLE_JS}) return 'element is not visible'; \
                 el.scrollIntoView({{ block: 'center' }}); el.click(); return 'ok';"
            );
            self.act(locator, &body).await
        }

        async fn fill(&self, locator: &Locator, value: &str) -> StorefrontResult<()> {
            tracing::debug!(locator = %locator, "fill");
            let body = format!(
                "if (!{VISIBLE_JS}) return 'element is not visible'; \
                 if (el.disabled || el.readOnly) return 'element is not editable'; \
                 el.focus(); \
                 const proto = el instanceof HTMLTextAreaElement \
                     ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
                 Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, {v}); \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return 'ok';",
                v = js_string(value)
            );
            self.act(locator, &body).await
        }

        async fn select_option(&self, locator: &Locator, value: &str) -> StorefrontResult<()> {
            tracing::debug!(locator = %locator, value, "select_option");
            let body = format!(
                "if (!{VISIBLE_JS}) return 'element is not visible'; \
                 const v = {v}; \
                 const opt = Array.from(el.options || []) \
                     .find(o => o.value === v || o.label === v || o.text.trim() === v); \
                 if (!opt) return 'no option ' + v; \
                 el.value = opt.value; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return 'ok';",
                v = js_string(value)
            );
            self.act(locator, &body).await
        }

        async fn set_checked(&self, locator: &Locator, checked: bool) -> StorefrontResult<()> {
            tracing::debug!(locator = %locator, checked, "set_checked");
            let body = format!(
                "if (el.checked !== {checked}) el.click(); \
                 return el.checked === {checked} ? 'ok' : 'state did not change';"
            );
            self.act(locator, &body).await
        }

        async fn is_checked(&self, locator: &Locator) -> StorefrontResult<bool> {
            Ok(self
                .on_first(locator, "return !!el.checked;")
                .await?
                .as_bool()
                .unwrap_or(false))
        }

        async fn text_content(&self, locator: &Locator) -> StorefrontResult<Option<String>> {
            Ok(self
                .on_first(locator, "return el.textContent;")
                .await?
                .as_str()
                .map(str::to_string))
        }

        async fn attribute(
            &self,
            locator: &Locator,
            name: &str,
        ) -> StorefrontResult<Option<String>> {
            let body = format!("return el.getAttribute({});", js_string(name));
            Ok(self
                .on_first(locator, &body)
                .await?
                .as_str()
                .map(str::to_string))
        }

        async fn input_value(&self, locator: &Locator) -> StorefrontResult<String> {
            Ok(self
                .on_first(locator, "return el.value === undefined ? '' : String(el.value);")
                .await?
                .as_str()
                .unwrap_or_default()
                .to_string())
        }

        async fn evaluate(&self, script: &str) -> StorefrontResult<Value> {
            self.eval(script).await
        }

        async fn screenshot(&self, full_page: bool) -> StorefrontResult<Vec<u8>> {
            let page = self.page.lock().await;
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .capture_beyond_viewport(full_page)
                .build();

            let screenshot = page
                .execute(params)
                .await
                .map_err(|e| StorefrontError::Screenshot {
                    message: e.to_string(),
                })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| StorefrontError::Screenshot {
                    message: e.to_string(),
                })
        }

        async fn set_viewport(&self, width: u32, height: u32) -> StorefrontResult<()> {
            let params = SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(width))
                .height(i64::from(height))
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(StorefrontError::driver)?;
            let page = self.page.lock().await;
            page.execute(params).await.map_err(driver_err)?;
            Ok(())
        }

        async fn accept_dialogs(&self) -> StorefrontResult<()> {
            {
                let page = self.page.lock().await;
                page.execute(AddScriptToEvaluateOnNewDocumentParams::new(ACCEPT_DIALOGS_JS))
                    .await
                    .map_err(driver_err)?;
            }
            self.eval(&format!("(() => {{ {ACCEPT_DIALOGS_JS} return true; }})()"))
                .await?;
            Ok(())
        }

        async fn clear_storage(&self) -> StorefrontResult<()> {
            {
                let page = self.page.lock().await;
                page.execute(ClearBrowserCookiesParams::default())
                    .await
                    .map_err(driver_err)?;
            }
            self.eval(
                "(() => { try { localStorage.clear(); sessionStorage.clear(); } catch (e) {} return true; })()",
            )
            .await?;
            Ok(())
        }

        async fn close(&self) -> StorefrontResult<()> {
            let mut browser = self.browser.lock().await;
            browser.close().await.map_err(driver_err)?;
            self.handle.abort();
            tracing::info!("chromium closed");
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use crate::Locator;

    mod launch_options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let options = LaunchOptions::default();
            assert!(options.headless);
            assert!(options.sandbox);
            assert_eq!(options.slow_mo, Duration::ZERO);
        }

        #[test]
        fn test_from_browser_options() {
            let config = EnvironmentConfig::from_lookup(|name| match name {
                "HEADLESS" => Some("true".into()),
                "SLOW_MO" => Some("250".into()),
                _ => None,
            });
            let options = LaunchOptions::from(config.browser());
            assert!(options.headless);
            assert_eq!(options.slow_mo, Duration::from_millis(250));
            assert_eq!((options.viewport_width, options.viewport_height), (1280, 720));
        }

        #[test]
        fn test_builders() {
            let options = LaunchOptions::default()
                .with_headless(false)
                .with_viewport(375, 667)
                .with_chromium_path("/usr/bin/chromium")
                .with_no_sandbox();
            assert!(!options.headless);
            assert!(!options.sandbox);
            assert_eq!(options.viewport_width, 375);
            assert_eq!(options.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        }
    }

    mod script_tests {
        use super::*;

        #[test]
        fn test_first_match_script_shape() {
            let script = first_match_script(&Locator::new("#logo"), "return el.id;");
            assert!(script.contains("found: false"));
            assert!(script.contains("return el.id;"));
            assert!(script.contains("querySelectorAll(\"#logo\")"));
        }

        #[test]
        fn test_visibility_script_checks_style() {
            assert!(VISIBLE_JS.contains("getComputedStyle"));
        }

        #[test]
        fn test_resource_count_outlives_timing_buffer() {
            assert!(RESOURCE_COUNT_JS.contains("PerformanceObserver"));
            assert!(RESOURCE_COUNT_JS.contains("buffered: true"));
            assert!(RESOURCE_COUNT_JS.contains("setResourceTimingBufferSize(100000)"));
            assert!(!RESOURCE_COUNT_JS.contains("getEntriesByType"));
        }
    }
}
