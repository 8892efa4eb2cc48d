//! SHA-1 digest of a credential, split for k-anonymity range queries.
//!
//! SHA-1 is fixed by the range service's wire format. It is a compatibility
//! requirement here, not a security choice.

use sha1::{Digest, Sha1};
use std::fmt;

/// Number of hex characters sent to the range service.
pub const PREFIX_LEN: usize = 5;

/// Number of hex characters in a full SHA-1 digest.
pub const DIGEST_LEN: usize = 40;

/// Uppercase SHA-1 hex digest of a credential, split into the 5-character
/// prefix that goes over the wire and the 35-character suffix kept locally.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialDigest {
    hex: String,
}

impl CredentialDigest {
    /// Hash the raw UTF-8 bytes of `credential`.
    pub fn of(credential: &str) -> Self {
        let hash = Sha1::digest(credential.as_bytes());
        Self {
            hex: format!("{hash:X}"),
        }
    }

    /// Hash an optional credential, treating `None` as the empty string.
    pub fn of_optional(credential: Option<&str>) -> Self {
        Self::of(credential.unwrap_or_default())
    }

    /// First 5 hex characters.
    pub fn prefix(&self) -> &str {
        &self.hex[..PREFIX_LEN]
    }

    /// Remaining 35 hex characters.
    pub fn suffix(&self) -> &str {
        &self.hex[PREFIX_LEN..]
    }

    /// Full 40-character digest.
    pub fn full(&self) -> &str {
        &self.hex
    }
}

// Keep the full digest out of logs and panics.
impl fmt::Debug for CredentialDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialDigest")
            .field("prefix", &self.prefix())
            .finish_non_exhaustive()
    }
}
