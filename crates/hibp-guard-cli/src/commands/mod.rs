//! Command implementations for the hibp-guard CLI

mod check;
mod digest;
mod rules;

pub use check::execute as check;
pub use digest::execute as digest;
pub use rules::execute as list_rules;

use anyhow::{Context, Result};
use std::io::BufRead;

use crate::cli::InputArgs;

/// Credentials named on the command line or read from stdin, one per line.
///
/// Trailing `\r`/`\n` is stripped; other whitespace is part of the credential.
pub(crate) fn read_credentials(input: &InputArgs) -> Result<Vec<String>> {
    if !input.stdin {
        return Ok(input.password.iter().cloned().collect());
    }
    collect_lines(std::io::stdin().lock())
}

fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    reader
        .lines()
        .map(|line| {
            line.map(|l| l.trim_end_matches('\r').to_string())
                .context("Failed to read credentials from stdin")
        })
        .collect()
}
