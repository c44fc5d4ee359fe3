use crate::config::{Config, TicketMatcher};
use crate::data::{FailureReason, PullRequestSnapshot};

/// Result of the ticket-presence checks, before any linking happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Bypass,
    Pass,
    Fail(FailureReason),
}

/// Decide whether the pull request is linked to a ticket. Pure: no I/O, no logging.
pub fn evaluate(config: &Config, matcher: &TicketMatcher, pr: &PullRequestSnapshot) -> Verdict {
    if pr.has_label(&config.bypass_label) {
        return Verdict::Bypass;
    }

    let title = pr.title.as_deref().unwrap_or("");
    if !config.ignore_title && !matcher.has_ticket(title) {
        return Verdict::Fail(FailureReason::Title);
    }

    let body = pr.body.as_deref().unwrap_or("");
    if !matcher.has_ticket(body) {
        return Verdict::Fail(FailureReason::Body);
    }

    Verdict::Pass
}
