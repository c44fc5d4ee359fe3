pub mod repo;

pub use repo::{parse_full_name, parse_github_url, resolve_repo};
