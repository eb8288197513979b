//! Page load timing and JS heap readings.

use crate::result::{StorefrontError, StorefrontResult};
use crate::session::PageSession;
use crate::wait::LoadState;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Default page load budget (5s)
pub const DEFAULT_PAGE_LOAD_BUDGET_MS: u64 = 5_000;

const MEMORY_SCRIPT: &str = "(() => { const m = performance.memory; \
    return m ? { usedJSHeapSize: m.usedJSHeapSize, totalJSHeapSize: m.totalJSHeapSize, \
    jsHeapSizeLimit: m.jsHeapSizeLimit } : null; })()";

/// `performance.memory` snapshot (Chromium only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    /// Heap in use, bytes
    #[serde(rename = "usedJSHeapSize")]
    pub used_js_heap_size: u64,
    /// Heap allocated, bytes
    #[serde(rename = "totalJSHeapSize")]
    pub total_js_heap_size: u64,
    /// Heap ceiling, bytes
    #[serde(rename = "jsHeapSizeLimit")]
    pub js_heap_size_limit: u64,
}

/// Time until the network goes idle.
///
/// Unlike [`PageSession::wait_for_page_load`] this is strict: a network that
/// never settles within the navigation timeout is an error.
pub async fn measure_page_load_time(session: &PageSession) -> StorefrontResult<Duration> {
    let start = Instant::now();
    session
        .driver()
        .wait_for_load_state(LoadState::NetworkIdle, session.config().timeouts().navigation())
        .await?;
    let elapsed = start.elapsed();
    tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "page load measured");
    Ok(elapsed)
}

/// Fail unless `elapsed` is strictly below `max`
pub fn assert_page_load_time(elapsed: Duration, max: Duration) -> StorefrontResult<()> {
    if elapsed < max {
        Ok(())
    } else {
        Err(StorefrontError::assertion(format!(
            "expected page load under {}ms, actual {}ms",
            max.as_millis(),
            elapsed.as_millis()
        )))
    }
}

/// [`assert_page_load_time`] with [`DEFAULT_PAGE_LOAD_BUDGET_MS`]
pub fn assert_default_page_load_time(elapsed: Duration) -> StorefrontResult<()> {
    assert_page_load_time(elapsed, Duration::from_millis(DEFAULT_PAGE_LOAD_BUDGET_MS))
}

/// JS heap usage, `None` where the browser does not expose it
pub async fn memory_usage(session: &PageSession) -> StorefrontResult<Option<MemoryUsage>> {
    let value = session.evaluate(MEMORY_SCRIPT).await?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}
