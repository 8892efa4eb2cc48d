//! # CLI Structure and Argument Parsing
//!
//! ```bash
//! # Check one password (visible in `ps`; prefer --stdin)
//! hibp-guard check 'correct horse battery staple'
//!
//! # Check many, one per line, sharing one range cache
//! cat candidates.txt | hibp-guard check --stdin --min 10 --format json
//!
//! # Show the prefix that would be sent
//! echo -n password | hibp-guard digest --stdin
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Main CLI structure for the `hibp-guard` command
#[derive(Parser, Clone, Debug)]
#[command(name = "hibp-guard")]
#[command(version)]
#[command(about = "Check passwords against the Pwned Passwords corpus without revealing them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Check credentials against the breach corpus
    Check(CheckArgs),

    /// Print the SHA-1 prefix and suffix of credentials (no network)
    Digest(InputArgs),

    /// List registered rule names
    Rules,
}

/// Where credentials come from
#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// Credential to check. Read from stdin instead with --stdin
    #[arg(value_name = "PASSWORD", required_unless_present = "stdin")]
    pub password: Option<String>,

    /// Read credentials from stdin, one per line
    #[arg(long, conflicts_with = "password")]
    pub stdin: bool,
}

#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Fail when a credential appears at least this many times
    #[arg(long, allow_negative_numbers = true, conflicts_with = "rule")]
    pub min: Option<i64>,

    /// Rule string, e.g. `hibp` or `hibp:min=3` (overrides config)
    #[arg(long)]
    pub rule: Option<String>,

    /// Range endpoint the hash prefix is appended to (overrides config)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Field name used in the failure message
    #[arg(long, default_value = "password")]
    pub attribute: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per credential
    Json,
}
