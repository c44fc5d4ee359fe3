use anyhow::{Context, Result};
use regex::Regex;

use crate::data::TicketPattern;

pub const DEFAULT_BYPASS_LABEL: &str = "no-ticket";
pub const DEFAULT_TICKET_BASE_URL: &str = "https://app.clickup.com/t/";

/// Settings for one run. Built once in `main` and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub ignore_title: bool,
    /// Read from the action inputs but has no effect: the body check is never skipped.
    pub ignore_body: bool,
    pub pattern: TicketPattern,
    pub bypass_label: String,
    pub ticket_base_url: String,
    pub dry_run: bool,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ignore_title: false,
            ignore_body: false,
            pattern: TicketPattern::ProjectKey,
            bypass_label: DEFAULT_BYPASS_LABEL.to_string(),
            ticket_base_url: DEFAULT_TICKET_BASE_URL.to_string(),
            dry_run: false,
        }
    }
}

/// Compiled regexes for the active ticket pattern family.
#[derive(Debug, Clone)]
pub struct TicketMatcher {
    token: Regex,
    linkable: Regex,
    linked: Regex,
    base_url: String,
}

impl TicketMatcher {
    pub fn new(pattern: TicketPattern, base_url: &str) -> Result<Self> {
        let token = Regex::new(pattern.token_regex())
            .with_context(|| format!("invalid {} ticket regex", pattern.to_str()))?;
        let linkable = Regex::new(&pattern.linkable_regex())
            .with_context(|| format!("invalid {} linkable regex", pattern.to_str()))?;
        let linked = Regex::new(&regex::escape(base_url)).context("invalid ticket base url")?;

        Ok(Self {
            token,
            linkable,
            linked,
            base_url: base_url.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.pattern, &config.ticket_base_url)
    }

    pub fn has_ticket(&self, text: &str) -> bool {
        self.token.is_match(text)
    }

    pub fn is_linked(&self, text: &str) -> bool {
        self.linked.is_match(text)
    }

    pub fn linkable(&self) -> &Regex {
        &self.linkable
    }

    pub fn ticket_url(&self, ticket_id: &str) -> String {
        format!("{}{}", self.base_url, ticket_id)
    }
}
