//! # hibp-guard-core
//!
//! Breached-password checks over the Pwned Passwords k-anonymity range API.
//!
//! Only the first 5 hex characters of a credential's SHA-1 digest leave the
//! process. The service answers with every known suffix under that prefix
//! and its occurrence count; the match against the withheld 35-character
//! suffix happens locally.
//!
//! ## Architecture
//!
//! - **Digest**: SHA-1, uppercase hex, split 5/35 ([`CredentialDigest`])
//! - **Fetcher**: one `GET {endpoint}{prefix}` with `Add-Padding: true`, no retries ([`RangeClient`])
//! - **Parser**: `SUFFIX:COUNT` lines, malformed lines dropped ([`RangeResponse`])
//! - **Cache**: raw bodies per prefix for one week ([`RangeCache`], [`MemoryCache`])
//! - **Threshold**: count `>= min` fails ([`Threshold`], [`is_safe`])
//! - **Checker**: the pipeline plus the fail-open policy ([`PwnedChecker`])
//! - **Params / Registry**: `min=<n>` parsing and `hibp:min=<n>` rule strings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hibp_guard_core::{MemoryCache, PwnedChecker, RangeClient, Threshold};
//! use std::sync::Arc;
//!
//! # async fn run() -> hibp_guard_core::Result<()> {
//! let checker = PwnedChecker::new(
//!     RangeClient::new()?,
//!     Arc::new(MemoryCache::new()),
//!     Threshold::default(),
//! );
//!
//! if !checker.check(Some("password")).await {
//!     println!("choose another password");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Runtime failures of the range service or cache never reach the caller of
//! [`PwnedChecker::check`]; the credential is reported safe. Malformed rule
//! parameters are returned as [`Error::Config`].

/// Shared TTL cache for range bodies
pub mod cache;
/// Pipeline orchestration and the `Checker` capability
pub mod checker;
/// Configuration loading with env overrides
pub mod config;
/// SHA-1 credential digest and prefix/suffix split
pub mod digest;
/// Error types and result aliases
pub mod error;
/// HTTP range client
pub mod fetcher;
/// `min=` rule parameter parsing
pub mod params;
/// Range body parser
pub mod parser;
/// Short-name rule registry
pub mod registry;
/// Minimum count and the pass/fail decision
pub mod threshold;

pub use cache::{
    CacheStats, CacheStore, Clock, DEFAULT_NAMESPACE, MemoryCache, ManualClock, RANGE_CACHE_TTL,
    RangeCache, SystemClock,
};
pub use checker::{Checker, DEFAULT_MESSAGE, MESSAGE_KEY, MessageTemplate, PwnedChecker};
pub use config::{GuardConfig, RangeConfig, RuleConfig};
pub use digest::CredentialDigest;
pub use error::{Error, Result};
pub use fetcher::{DEFAULT_ENDPOINT, RangeClient, RangeSource};
pub use params::minimum_from_params;
pub use parser::RangeResponse;
pub use registry::{HIBP_RULE, RuleContext, RuleRegistry};
pub use threshold::{Threshold, is_safe};
