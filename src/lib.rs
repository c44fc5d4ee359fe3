pub mod config;
pub mod data;
pub mod messages;
pub mod services;
pub mod utils;

pub use config::{Config, TicketMatcher};
pub use data::{FailureReason, LinkAction, Outcome, PullRequestSnapshot, RepoId, TicketPattern};
pub use services::{load_event, run_check, Annotations, GitHubApi};
