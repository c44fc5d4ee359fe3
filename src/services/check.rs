use anyhow::{Context, Result};
use std::io::Write;

use crate::config::{Config, TicketMatcher};
use crate::data::{LinkAction, Outcome, PullRequestSnapshot, RepoId};
use crate::messages;
use crate::services::annotations::Annotations;
use crate::services::github::PullRequestApi;
use crate::services::linker::link_ticket;
use crate::services::policy::{evaluate, Verdict};

const UPDATE_OK: u16 = 200;

/// Run the ticket check for one pull request and report it to the CI log.
///
/// Policy failures come back as `Outcome::Failed`. `Err` is reserved for
/// things that went wrong around the policy: writing the log, a missing
/// repository, or the update request itself not going through. A rejected
/// update (non-200 status) is logged and still counts as a pass.
pub async fn run_check<A: PullRequestApi, W: Write>(
    config: &Config,
    matcher: &TicketMatcher,
    pr: &PullRequestSnapshot,
    repo: Option<&RepoId>,
    api: &A,
    annotations: &mut Annotations<W>,
) -> Result<Outcome> {
    tracing::debug!(
        number = pr.number,
        pattern = config.pattern.to_str(),
        labels = pr.labels.len(),
        "evaluating pull request"
    );

    match evaluate(config, matcher, pr) {
        Verdict::Bypass => {
            annotations.info(messages::BYPASS)?;
            return Ok(Outcome::Bypassed);
        }
        Verdict::Fail(reason) => {
            annotations.error(&messages::missing_ticket(
                reason.to_str(),
                &config.bypass_label,
            ))?;
            return Ok(Outcome::Failed(reason));
        }
        Verdict::Pass => {}
    }

    let action = link_ticket(matcher, pr.body.as_deref().unwrap_or(""));
    match &action {
        LinkAction::AlreadyLinked => annotations.info(messages::SKIPPED_LINKING)?,
        LinkAction::NotLinkable => annotations.warning(messages::COULD_NOT_LINK)?,
        LinkAction::Rewritten(body) if config.dry_run => {
            annotations.notice(&format!("Dry run, the description would become:\n{}", body))?;
        }
        LinkAction::Rewritten(body) => {
            let repo = repo.context("Could not determine the repository of the pull request")?;
            let status = api
                .update_pull_request(repo, pr.number, pr.title.as_deref(), body)
                .await?;

            annotations.info(&format!("Response: {}", status))?;
            if status != UPDATE_OK {
                annotations.error(messages::UPDATE_FAILED)?;
            }
        }
    }

    annotations.info(messages::SUCCESS)?;
    Ok(Outcome::Passed(action))
}
