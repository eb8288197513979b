//! Browser driver abstraction.
//!
//! [`BrowserDriver`] is the seam between page objects and the browser. The
//! Chromium implementation lives in [`crate::browser`] (feature `browser`);
//! [`MockDriver`] is an in-memory document for unit and integration tests.
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌────────────────────┐
//! │ Page objects │──►│ PageSession │──►│ dyn BrowserDriver  │
//! └──────────────┘   └─────────────┘   │  ChromiumDriver    │
//!                                      │  MockDriver        │
//!                                      └────────────────────┘
//! ```

use crate::locator::Locator;
use crate::result::{StorefrontError, StorefrontResult};
use crate::wait::{LoadState, UrlPattern};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Smallest byte sequence recognised as a PNG
pub const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Abstract driver trait for browser automation
///
/// Every element operation resolves its [`Locator`] against the live
/// document at call time. Element operations act on the first match.
#[async_trait]
pub trait BrowserDriver: Send + Sync + fmt::Debug {
    /// Navigate to an absolute URL
    async fn goto(&self, url: &str, timeout: Duration) -> StorefrontResult<()>;

    /// Wait until the page reaches `state`
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration)
        -> StorefrontResult<()>;

    /// Current page URL
    async fn current_url(&self) -> StorefrontResult<String>;

    /// Document title
    async fn title(&self) -> StorefrontResult<String>;

    /// Reload the current page
    async fn reload(&self, timeout: Duration) -> StorefrontResult<()>;

    /// Number of matching elements
    async fn count(&self, locator: &Locator) -> StorefrontResult<usize>;

    /// Whether the first match is rendered and visible; `false` when nothing matches
    async fn is_visible(&self, locator: &Locator) -> StorefrontResult<bool>;

    /// Click the first match
    async fn click(&self, locator: &Locator) -> StorefrontResult<()>;

    /// Replace the value of an input or textarea
    async fn fill(&self, locator: &Locator, value: &str) -> StorefrontResult<()>;

    /// Select an option of a `<select>` by value or label
    async fn select_option(&self, locator: &Locator, value: &str) -> StorefrontResult<()>;

    /// Set a checkbox or radio button state
    async fn set_checked(&self, locator: &Locator, checked: bool) -> StorefrontResult<()>;

    /// Whether a checkbox or radio button is checked
    async fn is_checked(&self, locator: &Locator) -> StorefrontResult<bool>;

    /// Text content of the first match
    async fn text_content(&self, locator: &Locator) -> StorefrontResult<Option<String>>;

    /// Attribute of the first match
    async fn attribute(&self, locator: &Locator, name: &str)
        -> StorefrontResult<Option<String>>;

    /// Live value of a form control
    async fn input_value(&self, locator: &Locator) -> StorefrontResult<String>;

    /// Execute JavaScript in page context
    async fn evaluate(&self, script: &str) -> StorefrontResult<serde_json::Value>;

    /// Capture a PNG screenshot
    async fn screenshot(&self, full_page: bool) -> StorefrontResult<Vec<u8>>;

    /// Resize the viewport
    async fn set_viewport(&self, width: u32, height: u32) -> StorefrontResult<()>;

    /// Auto-accept alert, confirm and prompt dialogs from now on
    async fn accept_dialogs(&self) -> StorefrontResult<()>;

    /// Clear cookies and web storage
    async fn clear_storage(&self) -> StorefrontResult<()>;

    /// Close the browser
    async fn close(&self) -> StorefrontResult<()>;
}

/// Called when a mocked element is clicked or filled, with the element's index
pub type ClickHandler = Arc<dyn Fn(&mut MockPage, usize) + Send + Sync>;

/// Called when the mock navigates to a matching URL
pub type NavigationHandler = Arc<dyn Fn(&mut MockPage, &str) + Send + Sync>;

/// An element in the mock document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    /// Text content
    pub text: Option<String>,
    /// Live form value
    pub value: String,
    /// HTML attributes
    pub attributes: HashMap<String, String>,
    /// Checkbox/radio state
    pub checked: bool,
    /// Whether the element is rendered visibly
    pub visible: bool,
    /// Allowed values for a `<select>`; empty accepts anything
    pub options: Vec<String>,
}

impl MockElement {
    /// A visible element without text
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// A visible element with text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().with_text(text)
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the form value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Restrict selectable values
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the checked state
    #[must_use]
    pub const fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Mark as not visible
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    fn input_type(&self) -> Option<&str> {
        self.attributes.get("type").map(String::as_str)
    }
}

/// State of the mock document; handlers receive it mutably
pub struct MockPage {
    url: String,
    title: String,
    elements: HashMap<String, Vec<MockElement>>,
    click_handlers: HashMap<String, ClickHandler>,
    fill_handlers: HashMap<String, ClickHandler>,
    navigation_handlers: Vec<(UrlPattern, NavigationHandler)>,
    dom_ready: bool,
    network_idle: bool,
    goto_error: Option<String>,
    js_result: Option<serde_json::Value>,
    screenshot: Vec<u8>,
    viewport: Option<(u32, u32)>,
    dialogs_accepted: bool,
    closed: bool,
    history: Vec<String>,
}

impl fmt::Debug for MockPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockPage")
            .field("url", &self.url)
            .field("title", &self.title)
            .field("elements", &self.elements.len())
            .field("click_handlers", &self.click_handlers.len())
            .field("navigation_handlers", &self.navigation_handlers.len())
            .field("dom_ready", &self.dom_ready)
            .field("network_idle", &self.network_idle)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Default for MockPage {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            title: String::new(),
            elements: HashMap::new(),
            click_handlers: HashMap::new(),
            fill_handlers: HashMap::new(),
            navigation_handlers: Vec::new(),
            dom_ready: true,
            network_idle: true,
            goto_error: None,
            js_result: None,
            screenshot: PNG_SIGNATURE.to_vec(),
            viewport: None,
            dialogs_accepted: false,
            closed: false,
            history: Vec::new(),
        }
    }
}

impl MockPage {
    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Change the URL without running navigation handlers
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Change the URL and run matching navigation handlers
    pub fn navigate(&mut self, url: &str) {
        self.url = url.to_string();
        let handlers: Vec<NavigationHandler> = self
            .navigation_handlers
            .iter()
            .filter(|(pattern, _)| pattern.matches(url))
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(self, url);
        }
    }

    /// Set the document title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Remove every element and click handler
    pub fn reset_document(&mut self) {
        self.elements.clear();
        self.click_handlers.clear();
        self.fill_handlers.clear();
    }

    /// Elements matched by exactly this locator
    pub fn set_elements(&mut self, locator: &Locator, elements: Vec<MockElement>) {
        let _ = self.elements.insert(locator.key(), elements);
    }

    /// A single element matched by this locator
    pub fn set_element(&mut self, locator: &Locator, element: MockElement) {
        self.set_elements(locator, vec![element]);
    }

    /// Remove elements registered for this locator
    pub fn remove_elements(&mut self, locator: &Locator) {
        let _ = self.elements.remove(&locator.key());
    }

    /// Run `handler` when an element registered under `locator` is clicked
    pub fn on_click<F>(&mut self, locator: &Locator, handler: F)
    where
        F: Fn(&mut MockPage, usize) + Send + Sync + 'static,
    {
        let _ = self.click_handlers.insert(locator.key(), Arc::new(handler));
    }

    /// Run `handler` after an element registered under `locator` is filled
    pub fn on_fill<F>(&mut self, locator: &Locator, handler: F)
    where
        F: Fn(&mut MockPage, usize) + Send + Sync + 'static,
    {
        let _ = self.fill_handlers.insert(locator.key(), Arc::new(handler));
    }

    /// Run `handler` whenever the page navigates to a matching URL
    pub fn on_navigate<F>(&mut self, pattern: UrlPattern, handler: F)
    where
        F: Fn(&mut MockPage, &str) + Send + Sync + 'static,
    {
        self.navigation_handlers.push((pattern, Arc::new(handler)));
    }

    /// First element the locator resolves to
    #[must_use]
    pub fn element(&self, locator: &Locator) -> Option<&MockElement> {
        self.slot(locator)
            .and_then(|(key, index)| self.elements.get(&key).and_then(|els| els.get(index)))
    }

    /// Live value of the first match, `""` when nothing matches
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> String {
        self.element(locator)
            .map(|el| el.value.clone())
            .unwrap_or_default()
    }

    /// Checked state of the first match
    #[must_use]
    pub fn is_checked(&self, locator: &Locator) -> bool {
        self.element(locator).is_some_and(|el| el.checked)
    }

    /// Toggle DOM readiness
    pub fn set_dom_ready(&mut self, ready: bool) {
        self.dom_ready = ready;
    }

    /// Toggle network quiescence
    pub fn set_network_idle(&mut self, idle: bool) {
        self.network_idle = idle;
    }

    fn count(&self, locator: &Locator) -> usize {
        if let Some(els) = self.elements.get(&locator.key()) {
            return els.len();
        }
        match locator.final_index() {
            Some(i) => self
                .elements
                .get(&locator.without_final_index().key())
                .map_or(0, |els| usize::from(els.len() > i)),
            None => 0,
        }
    }

    /// Storage key and position of the first element the locator resolves to
    fn slot(&self, locator: &Locator) -> Option<(String, usize)> {
        let key = locator.key();
        if self.elements.get(&key).is_some_and(|els| !els.is_empty()) {
            return Some((key, 0));
        }
        let index = locator.final_index()?;
        let base = locator.without_final_index().key();
        self.elements
            .get(&base)
            .filter(|els| els.len() > index)
            .map(|_| (base, index))
    }

    fn actionable_slot(&self, locator: &Locator) -> StorefrontResult<(String, usize)> {
        let (key, index) = self
            .slot(locator)
            .ok_or_else(|| StorefrontError::ElementNotFound {
                selector: locator.key(),
            })?;
        let visible = self.elements.get(&key).is_some_and(|els| els[index].visible);
        if !visible {
            return Err(StorefrontError::NotActionable {
                selector: locator.key(),
                reason: "element is not visible".to_string(),
            });
        }
        Ok((key, index))
    }

    fn element_mut(&mut self, key: &str, index: usize) -> Option<&mut MockElement> {
        self.elements.get_mut(key).and_then(|els| els.get_mut(index))
    }

    fn record(&mut self, call: String) {
        self.history.push(call);
    }
}

/// Mock driver for unit testing
///
/// Elements are registered under locator keys. A locator with a final
/// `nth(i)` also resolves to element `i` of the collection registered
/// without the index.
#[derive(Debug, Default)]
pub struct MockDriver {
    page: Mutex<MockPage>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate the mock document
    pub fn with_page<R>(&self, f: impl FnOnce(&mut MockPage) -> R) -> R {
        f(&mut *self.page())
    }

    /// Register elements for a locator
    pub fn set_elements(&self, locator: &Locator, elements: Vec<MockElement>) {
        self.page().set_elements(locator, elements);
    }

    /// Register a single element for a locator
    pub fn set_element(&self, locator: &Locator, element: MockElement) {
        self.page().set_element(locator, element);
    }

    /// Register a click handler
    pub fn on_click<F>(&self, locator: &Locator, handler: F)
    where
        F: Fn(&mut MockPage, usize) + Send + Sync + 'static,
    {
        self.page().on_click(locator, handler);
    }

    /// Register a fill handler
    pub fn on_fill<F>(&self, locator: &Locator, handler: F)
    where
        F: Fn(&mut MockPage, usize) + Send + Sync + 'static,
    {
        self.page().on_fill(locator, handler);
    }

    /// Register a navigation handler
    pub fn on_navigate<F>(&self, pattern: UrlPattern, handler: F)
    where
        F: Fn(&mut MockPage, &str) + Send + Sync + 'static,
    {
        self.page().on_navigate(pattern, handler);
    }

    /// Toggle DOM readiness
    pub fn set_dom_ready(&self, ready: bool) {
        self.page().set_dom_ready(ready);
    }

    /// Toggle network quiescence
    pub fn set_network_idle(&self, idle: bool) {
        self.page().set_network_idle(idle);
    }

    /// Make every subsequent `goto` fail with this message
    pub fn set_goto_error(&self, message: Option<String>) {
        self.page().goto_error = message;
    }

    /// Set mock JS result
    pub fn set_js_result(&self, result: serde_json::Value) {
        self.page().js_result = Some(result);
    }

    /// Set mock screenshot bytes
    pub fn set_screenshot(&self, data: Vec<u8>) {
        self.page().screenshot = data;
    }

    /// Current URL
    #[must_use]
    pub fn url(&self) -> String {
        self.page().url.clone()
    }

    /// Last viewport set
    #[must_use]
    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.page().viewport
    }

    /// Whether dialogs are auto-accepted
    #[must_use]
    pub fn dialogs_accepted(&self) -> bool {
        self.page().dialogs_accepted
    }

    /// Whether `close` was called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.page().closed
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.page().history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.page().history.iter().any(|c| c.starts_with(method))
    }

    fn page(&self) -> MutexGuard<'_, MockPage> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BrowserDriver for MockDriver {
    async fn goto(&self, url: &str, _timeout: Duration) -> StorefrontResult<()> {
        let mut page = self.page();
        page.record(format!("goto:{url}"));
        if let Some(message) = page.goto_error.clone() {
            return Err(StorefrontError::Navigation {
                url: url.to_string(),
                message,
            });
        }
        page.navigate(url);
        Ok(())
    }

    async fn wait_for_load_state(
        &self,
        state: LoadState,
        timeout: Duration,
    ) -> StorefrontResult<()> {
        let reached = {
            let mut page = self.page();
            page.record(format!("wait_for_load_state:{state}"));
            match state {
                LoadState::DomContentLoaded | LoadState::Load => page.dom_ready,
                LoadState::NetworkIdle => page.network_idle,
            }
        };
        if reached {
            return Ok(());
        }
        tokio::time::sleep(timeout).await;
        Err(StorefrontError::timeout(
            state.event_name(),
            timeout.as_millis() as u64,
        ))
    }

    async fn current_url(&self) -> StorefrontResult<String> {
        Ok(self.page().url.clone())
    }

    async fn title(&self) -> StorefrontResult<String> {
        Ok(self.page().title.clone())
    }

    async fn reload(&self, _timeout: Duration) -> StorefrontResult<()> {
        let mut page = self.page();
        page.record("reload".to_string());
        let url = page.url.clone();
        page.navigate(&url);
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> StorefrontResult<usize> {
        Ok(self.page().count(locator))
    }

    async fn is_visible(&self, locator: &Locator) -> StorefrontResult<bool> {
        Ok(self.page().element(locator).is_some_and(|el| el.visible))
    }

    async fn click(&self, locator: &Locator) -> StorefrontResult<()> {
        let mut page = self.page();
        page.record(format!("click:{locator}"));
        let (key, index) = page.actionable_slot(locator)?;
        if let Some(el) = page.element_mut(&key, index) {
            match el.input_type() {
                Some("checkbox") => el.checked = !el.checked,
                Some("radio") => el.checked = true,
                _ => {}
            }
        }
        let handler = page.click_handlers.get(&key).cloned();
        if let Some(handler) = handler {
            handler(&mut *page, index);
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> StorefrontResult<()> {
        let mut page = self.page();
        page.record(format!("fill:{locator}={value}"));
        let (key, index) = page.actionable_slot(locator)?;
        if let Some(el) = page.element_mut(&key, index) {
            el.value = value.to_string();
        }
        let handler = page.fill_handlers.get(&key).cloned();
        if let Some(handler) = handler {
            handler(&mut *page, index);
        }
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> StorefrontResult<()> {
        let mut page = self.page();
        page.record(format!("select_option:{locator}={value}"));
        let (key, index) = page.actionable_slot(locator)?;
        if let Some(el) = page.element_mut(&key, index) {
            if !el.options.is_empty() && !el.options.iter().any(|o| o == value) {
                return Err(StorefrontError::NotActionable {
                    selector: locator.key(),
                    reason: format!("no option {value:?}"),
                });
            }
            el.value = value.to_string();
        }
        Ok(())
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> StorefrontResult<()> {
        let mut page = self.page();
        page.record(format!("set_checked:{locator}={checked}"));
        let (key, index) = page
            .slot(locator)
            .ok_or_else(|| StorefrontError::ElementNotFound {
                selector: locator.key(),
            })?;
        if let Some(el) = page.element_mut(&key, index) {
            el.checked = checked;
        }
        Ok(())
    }

    async fn is_checked(&self, locator: &Locator) -> StorefrontResult<bool> {
        let page = self.page();
        page.element(locator)
            .map(|el| el.checked)
            .ok_or_else(|| StorefrontError::ElementNotFound {
                selector: locator.key(),
            })
    }

    async fn text_content(&self, locator: &Locator) -> StorefrontResult<Option<String>> {
        let page = self.page();
        page.element(locator)
            .map(|el| el.text.clone())
            .ok_or_else(|| StorefrontError::ElementNotFound {
                selector: locator.key(),
            })
    }

    async fn attribute(
        &self,
        locator: &Locator,
        name: &str,
    ) -> StorefrontResult<Option<String>> {
        let page = self.page();
        page.element(locator)
            .map(|el| el.attributes.get(name).cloned())
            .ok_or_else(|| StorefrontError::ElementNotFound {
                selector: locator.key(),
            })
    }

    async fn input_value(&self, locator: &Locator) -> StorefrontResult<String> {
        let page = self.page();
        page.element(locator)
            .map(|el| el.value.clone())
            .ok_or_else(|| StorefrontError::ElementNotFound {
                selector: locator.key(),
            })
    }

    async fn evaluate(&self, script: &str) -> StorefrontResult<serde_json::Value> {
        let mut page = self.page();
        page.record(format!("evaluate:{}", script.len()));
        page.js_result.clone().ok_or_else(|| StorefrontError::Script {
            message: "No mock JS result set".to_string(),
        })
    }

    async fn screenshot(&self, full_page: bool) -> StorefrontResult<Vec<u8>> {
        let mut page = self.page();
        page.record(format!("screenshot:full_page={full_page}"));
        if page.screenshot.is_empty() {
            return Err(StorefrontError::Screenshot {
                message: "No mock screenshot set".to_string(),
            });
        }
        Ok(page.screenshot.clone())
    }

    async fn set_viewport(&self, width: u32, height: u32) -> StorefrontResult<()> {
        let mut page = self.page();
        page.record(format!("set_viewport:{width}x{height}"));
        page.viewport = Some((width, height));
        Ok(())
    }

    async fn accept_dialogs(&self) -> StorefrontResult<()> {
        let mut page = self.page();
        page.record("accept_dialogs".to_string());
        page.dialogs_accepted = true;
        Ok(())
    }

    async fn clear_storage(&self) -> StorefrontResult<()> {
        self.page().record("clear_storage".to_string());
        Ok(())
    }

    async fn close(&self) -> StorefrontResult<()> {
        let mut page = self.page();
        page.record("close".to_string());
        page.closed = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const T: Duration = Duration::from_millis(50);

    mod resolution_tests {
        use super::*;

        #[tokio::test]
        async fn test_count_and_nth_resolution() {
            let driver = MockDriver::new();
            let names = Locator::new(".product-thumb h4 a");
            driver.set_elements(
                &names,
                vec![MockElement::text("iPhone"), MockElement::text("MacBook")],
            );
            assert_eq!(driver.count(&names).await.unwrap(), 2);
            assert_eq!(driver.count(&names.nth(1)).await.unwrap(), 1);
            assert_eq!(driver.count(&names.nth(5)).await.unwrap(), 0);
            assert_eq!(
                driver.text_content(&names.nth(1)).await.unwrap().as_deref(),
                Some("MacBook")
            );
        }

        #[tokio::test]
        async fn test_missing_element_errors() {
            let driver = MockDriver::new();
            let err = driver.click(&Locator::new("#nope")).await.unwrap_err();
            assert!(matches!(err, StorefrontError::ElementNotFound { .. }));
            let err = driver
                .text_content(&Locator::new("#nope"))
                .await
                .unwrap_err();
            assert!(matches!(err, StorefrontError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_text_content_none_for_empty_element() {
            let driver = MockDriver::new();
            let cell = Locator::new("#empty");
            driver.set_element(&cell, MockElement::new());
            assert_eq!(driver.text_content(&cell).await.unwrap(), None);
        }

        #[tokio::test]
        async fn test_hidden_element_is_not_actionable() {
            let driver = MockDriver::new();
            let button = Locator::new("#button-cart");
            driver.set_element(&button, MockElement::new().hidden());
            assert!(!driver.is_visible(&button).await.unwrap());
            let err = driver.click(&button).await.unwrap_err();
            assert!(matches!(err, StorefrontError::NotActionable { .. }));
        }
    }

    mod interaction_tests {
        use super::*;

        #[tokio::test]
        async fn test_fill_sets_value() {
            let driver = MockDriver::new();
            let email = Locator::new("#input-email");
            driver.set_element(&email, MockElement::new());
            driver.fill(&email, "a@b.test").await.unwrap();
            assert_eq!(driver.input_value(&email).await.unwrap(), "a@b.test");
            assert!(driver.was_called("fill:#input-email"));
        }

        #[tokio::test]
        async fn test_click_toggles_checkbox() {
            let driver = MockDriver::new();
            let newsletter = Locator::new(r#"input[name="newsletter"]"#);
            driver.set_element(
                &newsletter,
                MockElement::new().with_attribute("type", "checkbox"),
            );
            driver.click(&newsletter).await.unwrap();
            assert!(driver.is_checked(&newsletter).await.unwrap());
            driver.click(&newsletter).await.unwrap();
            assert!(!driver.is_checked(&newsletter).await.unwrap());
        }

        #[tokio::test]
        async fn test_click_runs_handler_with_index() {
            let driver = MockDriver::new();
            let buttons = Locator::new(r#"button[onclick*="cart.add"]"#);
            driver.set_elements(&buttons, vec![MockElement::new(), MockElement::new()]);
            let clicked = Arc::new(AtomicUsize::new(usize::MAX));
            let seen = clicked.clone();
            driver.on_click(&buttons, move |_, index| seen.store(index, Ordering::SeqCst));
            driver.click(&buttons.nth(1)).await.unwrap();
            assert_eq!(clicked.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_select_option_rejects_unknown_value() {
            let driver = MockDriver::new();
            let select = Locator::new("#oldSelectMenu");
            driver.set_element(&select, MockElement::new().with_options(["1", "2"]));
            driver.select_option(&select, "2").await.unwrap();
            assert_eq!(driver.input_value(&select).await.unwrap(), "2");
            assert!(driver.select_option(&select, "9").await.is_err());
        }
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_goto_runs_matching_handler() {
            let driver = MockDriver::new();
            driver.on_navigate(UrlPattern::Contains("checkout/cart".into()), |page, _| {
                page.set_title("Shopping Cart");
            });
            driver
                .goto("https://shop.test/index.php?route=checkout/cart", T)
                .await
                .unwrap();
            assert_eq!(driver.title().await.unwrap(), "Shopping Cart");
            assert!(driver.url().ends_with("checkout/cart"));
        }

        #[tokio::test]
        async fn test_goto_error() {
            let driver = MockDriver::new();
            driver.set_goto_error(Some("net::ERR_NAME_NOT_RESOLVED".into()));
            let err = driver.goto("https://nowhere.test", T).await.unwrap_err();
            assert!(matches!(err, StorefrontError::Navigation { .. }));
        }

        #[tokio::test]
        async fn test_load_state_timeout() {
            let driver = MockDriver::new();
            driver.set_network_idle(false);
            driver
                .wait_for_load_state(LoadState::DomContentLoaded, T)
                .await
                .unwrap();
            let err = driver
                .wait_for_load_state(LoadState::NetworkIdle, T)
                .await
                .unwrap_err();
            assert!(err.is_timeout());
        }
    }

    mod misc_tests {
        use super::*;

        #[tokio::test]
        async fn test_screenshot_returns_png_signature() {
            let driver = MockDriver::new();
            let bytes = driver.screenshot(true).await.unwrap();
            assert!(bytes.starts_with(PNG_SIGNATURE));
        }

        #[tokio::test]
        async fn test_evaluate_without_result_errors() {
            let driver = MockDriver::new();
            assert!(driver.evaluate("1 + 1").await.is_err());
            driver.set_js_result(serde_json::json!(2));
            assert_eq!(driver.evaluate("1 + 1").await.unwrap(), 2);
        }

        #[tokio::test]
        async fn test_viewport_dialogs_close() {
            let driver = MockDriver::new();
            driver.set_viewport(800, 600).await.unwrap();
            driver.accept_dialogs().await.unwrap();
            driver.close().await.unwrap();
            assert_eq!(driver.viewport(), Some((800, 600)));
            assert!(driver.dialogs_accepted());
            assert!(driver.is_closed());
        }
    }
}
