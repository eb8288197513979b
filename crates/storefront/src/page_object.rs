//! Page Object Model support.
//!
//! Every screen of the site is a type implementing [`PageObject`]: it owns a
//! [`PageSession`] clone plus a locator map built at construction, and
//! exposes actions, queries and verifications in the site's vocabulary.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use storefront::{locator_map, PageObject, PageSession, StorefrontResult};
//!
//! locator_map! {
//!     struct AboutLocators {
//!         heading => "h1",
//!     }
//! }
//!
//! struct AboutPage {
//!     session: PageSession,
//!     locators: AboutLocators,
//! }
//!
//! #[async_trait]
//! impl PageObject for AboutPage {
//!     fn path(&self) -> &str {
//!         "/about"
//!     }
//!
//!     fn session(&self) -> &PageSession {
//!         &self.session
//!     }
//!
//!     async fn verify_loaded(&self) -> StorefrontResult<()> {
//!         self.session.assert_element_visible(&self.locators.heading).await
//!     }
//! }
//! ```

use crate::result::StorefrontResult;
use crate::session::PageSession;
use crate::wait::WaitOutcome;
use async_trait::async_trait;

/// Trait for page objects representing a page of the UI.
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Site path of this page, resolved against the base URL
    fn path(&self) -> &str;

    /// Session the page acts through
    fn session(&self) -> &PageSession;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Navigate to [`PageObject::path`] and wait for the page to settle
    async fn open(&self) -> StorefrontResult<WaitOutcome> {
        tracing::debug!(page = self.page_name(), path = self.path(), "open page");
        self.session().navigate_to(self.path()).await
    }

    /// Fail unless the page's key elements are visible
    async fn verify_loaded(&self) -> StorefrontResult<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use crate::driver::{MockDriver, MockElement};
    use crate::locator::Locator;
    use std::sync::Arc;

    struct StubPage {
        session: PageSession,
        marker: Locator,
    }

    #[async_trait]
    impl PageObject for StubPage {
        fn path(&self) -> &str {
            "/stub"
        }

        fn session(&self) -> &PageSession {
            &self.session
        }

        async fn verify_loaded(&self) -> StorefrontResult<()> {
            self.session.assert_element_visible(&self.marker).await
        }
    }

    fn stub() -> (Arc<MockDriver>, StubPage) {
        let driver = Arc::new(MockDriver::new());
        let config = EnvironmentConfig::from_lookup(|name| match name {
            "BASE_URL" => Some("https://site.test".into()),
            "EXPECT_TIMEOUT" => Some("50".into()),
            _ => None,
        });
        let page = StubPage {
            session: PageSession::new(driver.clone(), Arc::new(config)),
            marker: Locator::new("#marker"),
        };
        (driver, page)
    }

    #[test]
    fn test_page_name_is_short_type_name() {
        let (_driver, page) = stub();
        assert_eq!(page.page_name(), "StubPage");
    }

    #[tokio::test]
    async fn test_open_navigates_to_path() {
        let (driver, page) = stub();
        page.open().await.unwrap();
        assert_eq!(driver.url(), "https://site.test/stub");
    }

    #[tokio::test]
    async fn test_verify_loaded() {
        let (driver, page) = stub();
        assert!(page.verify_loaded().await.unwrap_err().is_assertion());
        driver.set_element(&Locator::new("#marker"), MockElement::new());
        page.verify_loaded().await.unwrap();
    }
}
