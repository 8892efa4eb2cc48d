//! Breached-credential checker.
//!
//! [`PwnedChecker`] runs the full pipeline: digest the credential, look up the
//! range body for its prefix through the [`RangeCache`], parse it and compare
//! the suffix count against the minimum.
//!
//! ## Fail-open
//!
//! A credential check must not block registration or login because a third
//! party is down. Any runtime failure (network, status, timeout, cache store)
//! is logged and the credential is reported as safe. Parameter errors are
//! different: [`PwnedChecker::validate`] returns them to the caller.

use crate::cache::{CacheStats, CacheStore, RangeCache};
use crate::digest::CredentialDigest;
use crate::fetcher::{RangeClient, RangeSource};
use crate::params::minimum_from_params;
use crate::parser::RangeResponse;
use crate::threshold::{Threshold, is_safe};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Translation key for the failure message.
pub const MESSAGE_KEY: &str = "validation.hibp";

/// English fallback for [`MESSAGE_KEY`], for hosts without their own catalog.
pub const DEFAULT_MESSAGE: &str =
    "The :attribute has appeared in a data leak at least :min times and should not be used.";

/// Reference to a failure message plus the parameters it is rendered with.
///
/// The message text belongs to the host's localization layer; this only
/// carries the key and the effective minimum. The attribute name is supplied
/// at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    /// Translation key.
    pub key: &'static str,
    /// Effective minimum, substituted for `:min` / `{min}`.
    pub min: Threshold,
}

impl MessageTemplate {
    /// Substitute `:attribute`/`{attribute}` and `:min`/`{min}` in `text`.
    ///
    /// Placeholders are matched as whole names in one pass, so `:minimum`
    /// is left alone and substituted values are never rescanned.
    pub fn render(&self, text: &str, attribute: &str) -> String {
        let min = self.min.to_string();
        let mut out = String::with_capacity(text.len() + attribute.len());
        let mut rest = text;

        while let Some(pos) = rest.find([':', '{']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            let (name, consumed) = if tail.starts_with('{') {
                match tail[1..].find('}') {
                    Some(end) => (&tail[1..=end], end + 2),
                    None => ("", 1),
                }
            } else {
                let len = tail[1..]
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(tail.len() - 1);
                (&tail[1..=len], len + 1)
            };

            let value = match name {
                "attribute" => Some(attribute),
                "min" => Some(min.as_str()),
                _ => None,
            };
            match value {
                Some(value) => {
                    out.push_str(value);
                    rest = &tail[consumed..];
                },
                None => {
                    out.push_str(&tail[..1]);
                    rest = &tail[1..];
                },
            }
        }

        out.push_str(rest);
        out
    }
}

/// A validation rule a host framework can invoke by name.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Whether `value` passes for the field named `field`.
    async fn evaluate(&self, field: &str, value: &str) -> bool;

    /// Message to show when [`Checker::evaluate`] returns `false`.
    fn describe_failure(&self) -> MessageTemplate;
}

/// k-anonymity check against a breached-password range service.
pub struct PwnedChecker<S = RangeClient> {
    cache: RangeCache<S>,
    minimum: Threshold,
    // Minimum applied by the latest check, reported by `describe_failure`.
    effective: AtomicU64,
}

impl<S: RangeSource> PwnedChecker<S> {
    /// Checker over `source`, caching range bodies in `store`.
    pub fn new(source: S, store: Arc<dyn CacheStore>, minimum: Threshold) -> Self {
        Self::from_cache(RangeCache::new(source, store), minimum)
    }

    /// Checker over a pre-built range cache (custom namespace).
    pub const fn from_cache(cache: RangeCache<S>, minimum: Threshold) -> Self {
        Self {
            cache,
            minimum,
            effective: AtomicU64::new(minimum.get()),
        }
    }

    /// Minimum count at which a credential fails.
    pub const fn minimum(&self) -> Threshold {
        self.minimum
    }

    /// Range cache hit/miss counters.
    pub const fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Run the pipeline without the fail-open policy.
    ///
    /// Returns `Ok(true)` when the credential is safe under `minimum`.
    pub async fn try_check_with(&self, credential: Option<&str>, minimum: Threshold) -> Result<bool> {
        let digest = CredentialDigest::of_optional(credential);
        let body = self.cache.fetch_cached(digest.prefix()).await?;
        let response = RangeResponse::parse(&body);
        let safe = is_safe(&response, digest.suffix(), minimum);
        debug!(
            prefix = digest.prefix(),
            candidates = response.len(),
            safe,
            "range evaluated"
        );
        Ok(safe)
    }

    /// [`Self::try_check_with`] at the configured minimum.
    pub async fn try_check(&self, credential: Option<&str>) -> Result<bool> {
        self.try_check_with(credential, self.minimum).await
    }

    /// Whether `credential` is safe, failing open on any runtime error.
    pub async fn check(&self, credential: Option<&str>) -> bool {
        self.check_with(credential, self.minimum).await
    }

    async fn check_with(&self, credential: Option<&str>, minimum: Threshold) -> bool {
        match self.try_check_with(credential, minimum).await {
            Ok(safe) => safe,
            Err(err) => {
                warn!(
                    category = err.category(),
                    recoverable = err.is_recoverable(),
                    "breach lookup failed, treating credential as safe: {err}"
                );
                true
            },
        }
    }

    /// Validate with rule parameters (`["min=3"]`), as a host invoking the
    /// rule by short name would.
    ///
    /// Malformed parameters return [`crate::Error::Config`]; they are not covered by
    /// the fail-open policy. The parsed minimum becomes the one
    /// [`Checker::describe_failure`] reports.
    pub async fn validate<P: AsRef<str> + Sync>(
        &self,
        attribute: &str,
        credential: &str,
        params: &[P],
    ) -> Result<bool> {
        let minimum = minimum_from_params(params)?;
        debug!(attribute, min = minimum.get(), "validating");
        self.effective.store(minimum.get(), Ordering::Relaxed);
        Ok(self.check_with(Some(credential), minimum).await)
    }
}

#[async_trait]
impl<S: RangeSource> Checker for PwnedChecker<S> {
    async fn evaluate(&self, field: &str, value: &str) -> bool {
        debug!(field, "evaluating breach rule");
        self.effective.store(self.minimum.get(), Ordering::Relaxed);
        self.check(Some(value)).await
    }

    fn describe_failure(&self) -> MessageTemplate {
        MessageTemplate {
            key: MESSAGE_KEY,
            min: Threshold::from_count(self.effective.load(Ordering::Relaxed)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::cache::MemoryCache;
    use crate::cache::tests::{BrokenStore, CountingSource};

    const PASSWORD_SUFFIX: &str = "1E4C9B93F3F0682250B6CF8331B7EE68FD8";

    fn password_body() -> String {
        format!(
            "003D68EB55068C33ACE09247EE4C639306B:3\r\n{PASSWORD_SUFFIX}:3730471\r\n012C192B2F16F82EA0EB9EF18D9D539B0DD:1\r\n"
        )
    }

    fn checker(source: Arc<CountingSource>, minimum: i64) -> PwnedChecker<Arc<CountingSource>> {
        PwnedChecker::new(source, Arc::new(MemoryCache::new()), Threshold::new(minimum))
    }

    #[tokio::test]
    async fn test_password_is_unsafe() {
        let checker = checker(Arc::new(CountingSource::ok(&password_body())), 1);
        assert!(!checker.check(Some("password")).await);
        assert!(!checker.evaluate("password", "password").await);
    }

    #[tokio::test]
    async fn test_minimum_above_count_is_safe() {
        let source = Arc::new(CountingSource::ok(&password_body()));
        assert!(checker(Arc::clone(&source), 4_000_000).check(Some("password")).await);
        assert!(checker(source, i64::MAX).check(Some("password")).await);
    }

    #[tokio::test]
    async fn test_absent_suffix_is_safe() {
        let checker = checker(Arc::new(CountingSource::ok(&password_body())), 1);
        assert!(
            checker
                .check(Some("jJv1zT7c]}L>G?R7=f^WFoA5M+-cVJeU:C._MEWCLpjs6y5o6uRfk39e-qAd"))
                .await
        );
    }

    #[tokio::test]
    async fn test_network_failure_fails_open() {
        let source = Arc::new(CountingSource::failing());
        let checker = checker(Arc::clone(&source), 1);

        assert!(checker.check(Some("password")).await);
        assert!(checker.try_check(Some("password")).await.is_err());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_failure_fails_open() {
        let checker = PwnedChecker::new(
            CountingSource::ok(&password_body()),
            Arc::new(BrokenStore),
            Threshold::default(),
        );
        assert!(checker.check(Some("password")).await);
    }

    #[tokio::test]
    async fn test_repeat_check_hits_cache() {
        let source = Arc::new(CountingSource::ok(&password_body()));
        let checker = checker(Arc::clone(&source), 1);

        assert!(!checker.check(Some("password")).await);
        assert!(!checker.check(Some("password")).await);

        assert_eq!(source.calls(), 1);
        assert_eq!(checker.cache_stats().misses(), 1);
        assert_eq!(checker.cache_stats().hits(), 1);
    }

    #[tokio::test]
    async fn test_validate_with_params() {
        let checker = checker(Arc::new(CountingSource::ok(&password_body())), 1);

        assert!(!checker.validate("password", "password", &["min=1"]).await.unwrap());
        assert!(checker.validate("password", "password", &["min=4000000"]).await.unwrap());
        assert!(!checker.validate::<&str>("password", "password", &[]).await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_params_even_when_service_is_down() {
        let checker = checker(Arc::new(CountingSource::failing()), 1);

        match checker.validate("password", "password", &["min=1", "max=1"]).await {
            Err(Error::Config(_)) => {},
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_none_credential_is_hashed_as_empty() {
        let source = Arc::new(CountingSource::ok("A94A8FE5CCB19BA61C4C0873D391E987982:1"));
        let checker = checker(source, 1);
        // SHA-1("") = DA39A..., so this unrelated row never matches.
        assert!(checker.check(None).await);
    }

    #[test]
    fn test_message_template_render() {
        let template = MessageTemplate {
            key: MESSAGE_KEY,
            min: Threshold::new(3),
        };
        assert_eq!(
            template.render(DEFAULT_MESSAGE, "password"),
            "The password has appeared in a data leak at least 3 times and should not be used."
        );
        assert_eq!(template.render("{attribute}/{min}", "pw"), "pw/3");
    }

    #[tokio::test]
    async fn test_describe_failure_reports_validated_minimum() {
        let checker = PwnedChecker::new(
            Arc::new(CountingSource::ok(&password_body())),
            Arc::new(MemoryCache::new()),
            Threshold::default(),
        );

        assert!(!checker.validate("password", "password", &["min=5"]).await.unwrap());
        assert_eq!(checker.describe_failure().min.get(), 5);
        assert_eq!(
            checker
                .describe_failure()
                .render(DEFAULT_MESSAGE, "password"),
            "The password has appeared in a data leak at least 5 times and should not be used."
        );

        assert!(!checker.evaluate("password", "password").await);
        assert_eq!(checker.describe_failure().min.get(), 1);
    }

    #[test]
    fn test_render_matches_whole_placeholder_names() {
        let template = MessageTemplate {
            key: MESSAGE_KEY,
            min: Threshold::new(7),
        };
        assert_eq!(
            template.render(":attribute needs :min, not :minimum", "secret:min"),
            "secret:min needs 7, not :minimum"
        );
        assert_eq!(template.render("{min} {attribute} {other", "a{min}"), "7 a{min} {other");
        assert_eq!(template.render("ratio 3:1 at :", "pw"), "ratio 3:1 at :");
    }

    #[test]
    fn test_describe_failure_carries_minimum() {
        let checker = checker(Arc::new(CountingSource::failing()), 0);
        let template = checker.describe_failure();
        assert_eq!(template.key, "validation.hibp");
        assert_eq!(template.min.get(), 1);
    }
}
