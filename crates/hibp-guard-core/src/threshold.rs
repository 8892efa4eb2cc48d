use crate::parser::RangeResponse;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum occurrence count at which a credential is rejected. Always ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u64")]
pub struct Threshold(u64);

impl Threshold {
    /// Normalize a raw minimum: the absolute value is taken and zero becomes 1.
    pub const fn new(raw: i64) -> Self {
        Self::from_count(raw.unsigned_abs())
    }

    /// Threshold from an unsigned count, coercing zero to 1.
    pub const fn from_count(count: u64) -> Self {
        if count == 0 { Self(1) } else { Self(count) }
    }

    /// The effective minimum.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(1)
    }
}

impl From<i64> for Threshold {
    fn from(raw: i64) -> Self {
        Self::new(raw)
    }
}

impl From<Threshold> for u64 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decide whether `suffix` is safe under `minimum`.
///
/// Safe when the suffix has no record or its count is strictly below the
/// minimum. A count equal to the minimum is unsafe.
pub fn is_safe(response: &RangeResponse, suffix: &str, minimum: Threshold) -> bool {
    response
        .count(suffix)
        .is_none_or(|count| count < minimum.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUFFIX: &str = "1E4C9B93F3F0682250B6CF8331B7EE68FD8";

    fn response() -> RangeResponse {
        RangeResponse::parse(&format!("{SUFFIX}:3730471\n01330C689E5D64F660D6947A93AD634EF8F:0"))
    }

    #[test]
    fn test_threshold_normalization() {
        assert_eq!(Threshold::default().get(), 1);
        assert_eq!(Threshold::new(0).get(), 1);
        assert_eq!(Threshold::new(-7).get(), 7);
        assert_eq!(Threshold::new(42).get(), 42);
        assert_eq!(Threshold::new(i64::MIN).get(), 1 << 63);
    }

    #[test]
    fn test_threshold_deserializes_through_normalization() {
        let threshold: Threshold = serde_json::from_str("-3").unwrap_or_default();
        assert_eq!(threshold.get(), 3);
        assert_eq!(serde_json::to_string(&Threshold::new(0)).ok().as_deref(), Some("1"));
    }

    #[test]
    fn test_count_at_or_above_minimum_is_unsafe() {
        let response = response();
        assert!(!is_safe(&response, SUFFIX, Threshold::new(1)));
        assert!(!is_safe(&response, SUFFIX, Threshold::new(3_730_471)));
    }

    #[test]
    fn test_count_below_minimum_is_safe() {
        assert!(is_safe(&response(), SUFFIX, Threshold::new(4_000_000)));
        assert!(is_safe(&response(), SUFFIX, Threshold::new(3_730_472)));
    }

    #[test]
    fn test_absent_suffix_is_safe() {
        assert!(is_safe(&response(), "0000000000000000000000000000000000A", Threshold::default()));
        assert!(is_safe(&RangeResponse::default(), SUFFIX, Threshold::default()));
    }

    #[test]
    fn test_padding_rows_are_safe() {
        assert!(is_safe(&response(), "01330C689E5D64F660D6947A93AD634EF8F", Threshold::default()));
    }
}
