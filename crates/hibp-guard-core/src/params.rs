//! Rule parameter parsing.
//!
//! The rule accepts a single `min=<integer>` token. Anything else is a
//! configuration mistake and surfaces as [`Error::Config`] at rule setup,
//! never downgraded by the fail-open policy.

use crate::cache::DEFAULT_NAMESPACE;
use crate::threshold::Threshold;
use crate::{Error, Result};

const MIN_PREFIX: &str = "min=";

/// Parse the minimum occurrence count from rule parameter tokens.
///
/// An empty list behaves like `["min=1"]`. Empty tokens are ignored. The
/// remainder after `min=` is read like a lenient integer cast: leading
/// whitespace and sign are accepted, trailing junk is ignored and text
/// without digits reads as zero. The result is normalized by
/// [`Threshold::new`].
///
/// ```rust
/// use hibp_guard_core::minimum_from_params;
///
/// assert_eq!(minimum_from_params(&["min=3"]).unwrap().get(), 3);
/// assert_eq!(minimum_from_params::<&str>(&[]).unwrap().get(), 1);
/// assert!(minimum_from_params(&["min=1", "max=1"]).is_err());
/// ```
pub fn minimum_from_params<S: AsRef<str>>(params: &[S]) -> Result<Threshold> {
    let tokens: Vec<&str> = if params.is_empty() {
        vec!["min=1"]
    } else {
        params.iter().map(AsRef::as_ref).collect()
    };

    let filtered: Vec<&str> = tokens.iter().copied().filter(|t| !t.is_empty()).collect();

    let [token] = filtered.as_slice() else {
        return Err(Error::Config(format!(
            "The rule {DEFAULT_NAMESPACE} only accepts one argument (\"min\"), more were provided: {}",
            serde_json::to_string(&tokens)?
        )));
    };

    let Some(raw) = token.strip_prefix(MIN_PREFIX) else {
        return Err(Error::Config(format!(
            "The rule {DEFAULT_NAMESPACE} only accepts one argument (\"min\"), something different provided: {token}"
        )));
    };

    Ok(Threshold::new(lenient_int(raw)))
}

fn lenient_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative { value.saturating_neg() } else { value }
}
