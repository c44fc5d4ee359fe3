pub mod models;
pub mod types;

pub use models::{EventPayload, EventRepository, Label, PullRequestSnapshot, RepoId};
pub use types::{FailureReason, LinkAction, Outcome, TicketPattern};
