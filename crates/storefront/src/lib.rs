//! Storefront: page-object end-to-end suite for a demo storefront.
//!
//! Browser journeys are written against page objects that own their
//! selectors and speak the site's vocabulary (search, add to cart, register)
//! on top of a shared [`PageSession`]. The session drives any
//! [`BrowserDriver`]: Chromium over CDP with the `browser` feature, or the
//! in-memory [`MockDriver`] for unit tests.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ Scenarios  │──►│ Page objects│──►│ PageSession │──►│ BrowserDriver│
//! │ + runner   │   │ (locators)  │   │ (waits)     │   │ CDP / mock   │
//! └────────────┘   └─────────────┘   └─────────────┘   └──────────────┘
//!        ▲                                  ▲
//!        └──────── EnvironmentConfig ───────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront::pages::HomePage;
//! use storefront::{EnvironmentConfig, MockDriver, PageObject, PageSession};
//!
//! # async fn demo() -> storefront::StorefrontResult<()> {
//! let config = Arc::new(EnvironmentConfig::from_env());
//! let session = PageSession::new(Arc::new(MockDriver::new()), config);
//! let home = HomePage::new(session);
//! home.open().await?;
//! home.verify_loaded().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod assertions;
mod browser;
pub mod config;
mod driver;
mod locator;
mod page_object;
pub mod pages;
pub mod performance;
mod result;
pub mod runner;
pub mod scenarios;
mod session;
pub mod test_data;
mod wait;

pub use browser::LaunchOptions;
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::EnvironmentConfig;
pub use driver::{
    BrowserDriver, ClickHandler, MockDriver, MockElement, MockPage, NavigationHandler,
    PNG_SIGNATURE,
};
pub use locator::{Locator, LocatorStep, Selector, STEP_SEPARATOR};
pub use page_object::PageObject;
pub use result::{StorefrontError, StorefrontResult};
pub use runner::{ScenarioResult, ScenarioRunner, SuiteReport};
pub use scenarios::{catalog, Scenario};
pub use session::PageSession;
pub use test_data::TestDataGenerator;
pub use wait::{
    poll_until, LoadState, Probe, SettlePolicy, UrlPattern, UrlRegex, WaitOutcome,
    DEFAULT_POLL_INTERVAL_MS, NETWORK_IDLE_THRESHOLD_MS,
};

/// Everything a scenario author usually needs
pub mod prelude {
    pub use super::assertions::*;
    pub use super::pages::*;
    pub use super::{
        EnvironmentConfig, Locator, MockDriver, MockElement, PageObject, PageSession,
        StorefrontError, StorefrontResult, TestDataGenerator, UrlPattern, WaitOutcome,
    };
}
