//! Check command implementation

use std::sync::Arc;

use anyhow::{Result, anyhow};
use hibp_guard_core::{
    Checker, CredentialDigest, DEFAULT_MESSAGE, GuardConfig, HIBP_RULE, MemoryCache, RuleContext,
    RuleRegistry,
};
use serde::Serialize;
use tracing::debug;

use super::read_credentials;
use crate::cli::{CheckArgs, OutputFormat};
use crate::error::CliError;

/// One line of `--format json` output. The credential itself is never
/// included; the prefix is what the range service saw.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    attribute: &'a str,
    prefix: String,
    safe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Execute the check command
pub async fn execute(args: CheckArgs) -> Result<()> {
    let mut config = GuardConfig::load()?;
    if let Some(endpoint) = &args.endpoint {
        config.range.endpoint.clone_from(endpoint);
    }
    if let Some(timeout) = args.timeout {
        config.range.timeout_secs = timeout;
    }

    let rule = resolve_rule(&args, &config);
    debug!(rule = %rule, endpoint = %config.range.endpoint, "resolved check");

    let ctx = RuleContext {
        source: Arc::new(config.range.client()?),
        store: Arc::new(MemoryCache::new()),
    };
    let checker = RuleRegistry::with_defaults()
        .build(&rule, &ctx)
        .map_err(CliError::usage)?;

    let credentials = read_credentials(&args.input)?;
    let template = checker.describe_failure();
    let mut failed = 0usize;

    for credential in &credentials {
        let safe = checker.evaluate(&args.attribute, credential).await;
        if !safe {
            failed += 1;
        }
        let report = CheckReport {
            attribute: &args.attribute,
            prefix: CredentialDigest::of(credential).prefix().to_string(),
            safe,
            message: (!safe).then(|| template.render(DEFAULT_MESSAGE, &args.attribute)),
        };
        print_report(&report, args.format)?;
    }

    if failed > 0 {
        return Err(CliError::breached(anyhow!(
            "{failed} of {} credential(s) failed the breach check",
            credentials.len()
        ))
        .into());
    }
    Ok(())
}

/// `--rule` wins, then `--min`, then the configured rule.
fn resolve_rule(args: &CheckArgs, config: &GuardConfig) -> String {
    if let Some(rule) = &args.rule {
        return rule.clone();
    }
    if let Some(min) = args.min {
        return format!("{HIBP_RULE}:min={min}");
    }
    config.rule.spec()
}

fn print_report(report: &CheckReport<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", text_line(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string(report)?),
    }
    Ok(())
}

fn text_line(report: &CheckReport<'_>) -> String {
    match &report.message {
        None => format!("PASS {}", report.prefix),
        Some(message) => format!("FAIL {} {message}", report.prefix),
    }
}
