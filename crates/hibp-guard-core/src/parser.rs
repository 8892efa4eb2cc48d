//! Parser for range response bodies.
//!
//! The body is one `SUFFIX:COUNT` record per line. The service is not trusted
//! to be well formed, so any line that does not split into a suffix and a
//! non-negative decimal count is dropped instead of failing the parse.
//!
//! When a suffix appears more than once, the last record wins.

use std::collections::HashMap;
use tracing::trace;

/// Suffix → occurrence count for one hash prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeResponse {
    counts: HashMap<String, u64>,
}

impl RangeResponse {
    /// Parse a raw body. Never fails; a malformed or empty body yields an
    /// empty response.
    pub fn parse(body: &str) -> Self {
        let mut counts = HashMap::new();
        let mut dropped = 0usize;

        for line in body.lines() {
            match parse_line(line) {
                Some((suffix, count)) => {
                    counts.insert(suffix.to_string(), count);
                },
                None if line.trim().is_empty() => {},
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            trace!(dropped, kept = counts.len(), "dropped malformed range lines");
        }

        Self { counts }
    }

    /// Count recorded for `suffix`, compared case-sensitively.
    pub fn count(&self, suffix: &str) -> Option<u64> {
        self.counts.get(suffix).copied()
    }

    /// Whether `suffix` has a record.
    pub fn contains(&self, suffix: &str) -> bool {
        self.counts.contains_key(suffix)
    }

    /// Number of distinct suffixes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when no line was accepted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(suffix, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

fn parse_line(line: &str) -> Option<(&str, u64)> {
    let (suffix, count) = line.trim().split_once(':')?;
    let count = count.trim();
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    count.parse().ok().map(|count| (suffix, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_crlf_body() {
        let body = "003D68EB55068C33ACE09247EE4C639306B:3\r\n\
                    1E4C9B93F3F0682250B6CF8331B7EE68FD8:3730471\r\n\
                    01330C689E5D64F660D6947A93AD634EF8F:0\r\n";
        let response = RangeResponse::parse(body);

        assert_eq!(response.len(), 3);
        assert_eq!(
            response.count("1E4C9B93F3F0682250B6CF8331B7EE68FD8"),
            Some(3_730_471)
        );
        assert_eq!(response.count("01330C689E5D64F660D6947A93AD634EF8F"), Some(0));
    }

    #[test]
    fn test_drops_malformed_lines() {
        let body = "AAAA:12\n\
                    no-colon-here\n\
                    BBBB:not-a-number\n\
                    CCCC:-4\n\
                    DDDD:1.5\n\
                    EEEE:\n\
                    FFFF:7:extra\n\
                    \n\
                    GGGG:  9  \n";
        let response = RangeResponse::parse(body);

        let mut pairs: Vec<_> = response.iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![("AAAA", 12), ("GGGG", 9)]);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let response = RangeResponse::parse("ABC:1\nABC:42\n");
        assert_eq!(response.count("ABC"), Some(42));
        assert_eq!(response.len(), 1);
    }

    #[test]
    fn test_suffix_case_is_kept() {
        let response = RangeResponse::parse("abcdef:5");
        assert!(response.contains("abcdef"));
        assert!(!response.contains("ABCDEF"));
    }

    #[test]
    fn test_empty_and_garbage_bodies() {
        assert!(RangeResponse::parse("").is_empty());
        assert!(RangeResponse::parse("<html>Service Unavailable</html>").is_empty());
    }

    #[test]
    fn test_count_overflow_is_dropped() {
        let response = RangeResponse::parse("ABC:99999999999999999999999999");
        assert!(response.is_empty());
    }
}
