//! Short-name rule registry.
//!
//! Hosts that describe validation rules as strings (`"hibp"`,
//! `"hibp:min=3"`) resolve them here. Rule strings are split as
//! `<name>[:<param>,<param>...]`; parameters go to the rule's constructor, so
//! malformed ones fail at build time, before any credential is evaluated.

use crate::cache::CacheStore;
use crate::checker::{Checker, PwnedChecker};
use crate::fetcher::RangeSource;
use crate::params::minimum_from_params;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Short name of the breached-password rule.
pub const HIBP_RULE: &str = "hibp";

/// Shared collaborators handed to every rule constructor.
#[derive(Clone)]
pub struct RuleContext {
    /// Range source rules query.
    pub source: Arc<dyn RangeSource>,
    /// Process-wide cache store.
    pub store: Arc<dyn CacheStore>,
}

type Constructor = Box<dyn Fn(&RuleContext, &[&str]) -> Result<Box<dyn Checker>> + Send + Sync>;

/// Maps rule names to constructors.
#[derive(Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, Constructor>,
}

impl RuleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `hibp` rule.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HIBP_RULE, |ctx, params| {
            let minimum = minimum_from_params(params)?;
            let checker: Box<dyn Checker> = Box::new(PwnedChecker::new(
                Arc::clone(&ctx.source),
                Arc::clone(&ctx.store),
                minimum,
            ));
            Ok(checker)
        });
        registry
    }

    /// Register `constructor` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&RuleContext, &[&str]) -> Result<Box<dyn Checker>> + Send + Sync + 'static,
    {
        self.rules.insert(name.to_string(), Box::new(constructor));
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Build the checker described by `rule` (`"hibp"`, `"hibp:min=3"`).
    pub fn build(&self, rule: &str, ctx: &RuleContext) -> Result<Box<dyn Checker>> {
        let (name, params) = split_rule(rule);
        let constructor = self
            .rules
            .get(name)
            .ok_or_else(|| Error::Config(format!("Unknown rule '{name}'")))?;
        constructor(ctx, params.as_slice())
    }
}

fn split_rule(rule: &str) -> (&str, Vec<&str>) {
    match rule.trim().split_once(':') {
        Some((name, params)) => (name, params.split(',').collect()),
        None => (rule.trim(), Vec::new()),
    }
}
