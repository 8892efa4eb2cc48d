//! Digest command: show what would be sent, without any network access

use anyhow::Result;
use hibp_guard_core::CredentialDigest;

use super::read_credentials;
use crate::cli::InputArgs;

/// Print `PREFIX SUFFIX` for each credential.
pub fn execute(input: &InputArgs) -> Result<()> {
    for credential in read_credentials(input)? {
        println!("{}", render(&CredentialDigest::of(&credential)));
    }
    Ok(())
}

fn render(digest: &CredentialDigest) -> String {
    format!("{} {}", digest.prefix(), digest.suffix())
}
