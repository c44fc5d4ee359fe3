pub mod annotations;
pub mod check;
pub mod github;
pub mod linker;
pub mod policy;

pub use annotations::{escape_data, set_output, Annotations};
pub use check::run_check;
pub use github::{load_event, parse_event, GitHubApi, PullRequestApi};
pub use linker::link_ticket;
pub use policy::{evaluate, Verdict};
