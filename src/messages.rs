//! User-facing messages written to the CI log.

pub const SUCCESS: &str = "Thank you for connecting the PR with a ticket.";
pub const BYPASS: &str = "The label to bypass this check was found, no checks will be performed.";
pub const SKIPPED_LINKING: &str = "The ticket is already linked, skipped linking.";
pub const COULD_NOT_LINK: &str = "Could not link the ticket.";
pub const UPDATE_FAILED: &str = "Updating the pull request has failed";

pub fn missing_ticket(reason: &str, bypass_label: &str) -> String {
    format!(
        "Please connect the PR's {} to a ticket or add the \"{}\" label to bypass this check.",
        reason, bypass_label
    )
}
