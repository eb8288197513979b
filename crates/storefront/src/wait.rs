//! Wait mechanisms.
//!
//! Load states, URL patterns, the settle policy for best-effort waits, and
//! the polling loop behind actionability checks and assertions.

use crate::result::{StorefrontError, StorefrontResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Network idle threshold (500ms without requests)
pub const NETWORK_IDLE_THRESHOLD_MS: u64 = 500;

/// Page load states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadState {
    /// `DOMContentLoaded` has fired
    DomContentLoaded,
    /// The `load` event has fired
    #[default]
    Load,
    /// No network activity for [`NETWORK_IDLE_THRESHOLD_MS`]
    NetworkIdle,
}

impl LoadState {
    /// Event name as used by browsers
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Load => "load",
            Self::NetworkIdle => "networkidle",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

/// Compiled URL regex, compared and serialized by its source text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrlRegex(regex::Regex);

impl UrlRegex {
    /// Compile `pattern`
    pub fn new(pattern: &str) -> StorefrontResult<Self> {
        regex::Regex::new(pattern)
            .map(Self)
            .map_err(|e| StorefrontError::invalid_argument(format!("bad URL pattern: {e}")))
    }

    /// Source text of the pattern
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Match anywhere in `url`
    #[must_use]
    pub fn is_match(&self, url: &str) -> bool {
        self.0.is_match(url)
    }
}

impl PartialEq for UrlRegex {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for UrlRegex {}

impl TryFrom<String> for UrlRegex {
    type Error = StorefrontError;

    fn try_from(pattern: String) -> StorefrontResult<Self> {
        Self::new(&pattern)
    }
}

impl From<UrlRegex> for String {
    fn from(regex: UrlRegex) -> Self {
        regex.as_str().to_string()
    }
}

/// URL pattern for navigation checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Contains substring
    Contains(String),
    /// Regex match anywhere in the URL
    Regex(UrlRegex),
    /// Match any URL
    Any,
}

impl UrlPattern {
    /// Regex pattern, compiled up front
    pub fn regex(pattern: &str) -> StorefrontResult<Self> {
        UrlRegex::new(pattern).map(Self::Regex)
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Contains(pattern) => url.contains(pattern.as_str()),
            Self::Regex(regex) => regex.is_match(url),
            Self::Any => true,
        }
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(p) => write!(f, "{p}"),
            Self::Contains(p) => write!(f, "*{p}*"),
            Self::Regex(p) => write!(f, "/{}/", p.as_str()),
            Self::Any => write!(f, "*"),
        }
    }
}

/// Bounds for [`crate::PageSession::wait_for_page_load`].
///
/// DOM readiness is always required. Network idle is best effort unless
/// `require_network_idle` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlePolicy {
    /// Budget for DOM readiness
    pub dom_ready_timeout_ms: u64,
    /// Budget for network quiescence
    pub network_idle_timeout_ms: u64,
    /// Fail instead of proceeding when the network never goes idle
    pub require_network_idle: bool,
}

impl SettlePolicy {
    /// Default DOM-ready budget
    pub const DEFAULT_DOM_READY_TIMEOUT_MS: u64 = 10_000;

    /// Default network-idle budget
    pub const DEFAULT_NETWORK_IDLE_TIMEOUT_MS: u64 = 5_000;

    /// DOM-ready budget as a duration
    #[must_use]
    pub const fn dom_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.dom_ready_timeout_ms)
    }

    /// Network-idle budget as a duration
    #[must_use]
    pub const fn network_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.network_idle_timeout_ms)
    }

    /// Set whether network idle is mandatory
    #[must_use]
    pub const fn with_required_network_idle(mut self, required: bool) -> Self {
        self.require_network_idle = required;
        self
    }
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            dom_ready_timeout_ms: Self::DEFAULT_DOM_READY_TIMEOUT_MS,
            network_idle_timeout_ms: Self::DEFAULT_NETWORK_IDLE_TIMEOUT_MS,
            require_network_idle: false,
        }
    }
}

/// How a page-load wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitOutcome {
    /// DOM ready and network idle
    Settled,
    /// DOM ready, network still busy when the budget ran out
    ProceededWithoutNetworkIdle {
        /// Time spent waiting for network idle
        waited_ms: u64,
    },
}

impl WaitOutcome {
    /// Whether the network went idle
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Settled)
    }
}

/// Result of one probe in [`poll_until`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T, P> {
    /// Condition met
    Done(T),
    /// Not yet; carries the latest observation
    Retry(P),
}

/// Run `probe` until it reports [`Probe::Done`] or `timeout` elapses.
///
/// The probe always runs at least once. On timeout the last
/// [`Probe::Retry`] observation is returned so callers can report what they
/// actually saw. Errors from the probe end the wait immediately.
pub async fn poll_until<T, P, F, Fut>(timeout: Duration, mut probe: F) -> StorefrontResult<Probe<T, P>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StorefrontResult<Probe<T, P>>>,
{
    let interval = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
    let deadline = Instant::now() + timeout;

    loop {
        match probe().await? {
            Probe::Done(value) => return Ok(Probe::Done(value)),
            Probe::Retry(seen) => {
                let now = Instant::now();
                if now >= deadline {
                    return Ok(Probe::Retry(seen));
                }
                tokio::time::sleep(interval.min(deadline - now)).await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    mod load_state_tests {
        use super::*;

        #[test]
        fn test_event_names() {
            assert_eq!(LoadState::DomContentLoaded.to_string(), "DOMContentLoaded");
            assert_eq!(LoadState::NetworkIdle.event_name(), "networkidle");
            assert_eq!(LoadState::default(), LoadState::Load);
        }
    }

    mod url_pattern_tests {
        use super::*;

        #[test]
        fn test_regex_matches_anywhere() {
            let pattern = UrlPattern::regex(".*account.*").unwrap();
            assert!(pattern.matches("https://shop.test/index.php?route=account/account"));
            assert!(!pattern.matches("https://shop.test/index.php?route=common/home"));
        }

        #[test]
        fn test_invalid_regex_rejected() {
            let err = UrlPattern::regex("(unclosed").unwrap_err();
            assert!(matches!(err, StorefrontError::InvalidArgument { .. }));
        }

        #[test]
        fn test_regex_serializes_as_source_text() {
            let pattern = UrlPattern::regex(r"route=product/\d+").unwrap();
            assert_eq!(pattern.to_string(), r"/route=product/\d+/");

            let json = serde_json::to_string(&pattern).unwrap();
            assert_eq!(json, r#"{"Regex":"route=product/\\d+"}"#);
            let back: UrlPattern = serde_json::from_str(&json).unwrap();
            assert_eq!(back, pattern);
            assert!(back.matches("https://shop.test/index.php?route=product/42"));
        }

        #[test]
        fn test_invalid_regex_rejected_on_deserialize() {
            let err = serde_json::from_str::<UrlPattern>(r#"{"Regex":"(unclosed"}"#).unwrap_err();
            assert!(err.to_string().contains("bad URL pattern"));
        }

        #[test]
        fn test_contains_and_exact() {
            assert!(UrlPattern::Contains("search".into()).matches("/index.php?route=product/search"));
            assert!(UrlPattern::Exact("https://a.test/".into()).matches("https://a.test/"));
            assert!(!UrlPattern::Exact("https://a.test/".into()).matches("https://a.test/x"));
            assert!(UrlPattern::Any.matches(""));
        }
    }

    mod settle_policy_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let policy = SettlePolicy::default();
            assert_eq!(policy.dom_ready_timeout(), Duration::from_secs(10));
            assert_eq!(policy.network_idle_timeout(), Duration::from_secs(5));
            assert!(!policy.require_network_idle);
            assert!(policy.with_required_network_idle(true).require_network_idle);
        }

        #[test]
        fn test_outcome_is_settled() {
            assert!(WaitOutcome::Settled.is_settled());
            assert!(!WaitOutcome::ProceededWithoutNetworkIdle { waited_ms: 5 }.is_settled());
        }
    }

    mod poll_tests {
        use super::*;

        #[tokio::test]
        async fn test_poll_returns_when_done() {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = calls.clone();
            let result = poll_until(Duration::from_secs(2), || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, StorefrontError>(if n >= 2 {
                        Probe::Done(n)
                    } else {
                        Probe::Retry(n)
                    })
                }
            })
            .await
            .unwrap();
            assert_eq!(result, Probe::Done(2));
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_poll_times_out_with_last_observation() {
            let result: Probe<(), &str> =
                poll_until(Duration::from_millis(120), || async { Ok(Probe::Retry("hidden")) })
                    .await
                    .unwrap();
            assert_eq!(result, Probe::Retry("hidden"));
        }

        #[tokio::test]
        async fn test_poll_runs_once_with_zero_timeout() {
            let result: Probe<u8, ()> =
                poll_until(Duration::ZERO, || async { Ok(Probe::Done(7)) })
                    .await
                    .unwrap();
            assert_eq!(result, Probe::Done(7));
        }

        #[tokio::test]
        async fn test_poll_propagates_errors() {
            let result: StorefrontResult<Probe<(), ()>> =
                poll_until(Duration::from_secs(1), || async {
                    Err(StorefrontError::driver("page crashed"))
                })
                .await;
            assert!(matches!(result, Err(StorefrontError::Driver { .. })));
        }
    }
}
