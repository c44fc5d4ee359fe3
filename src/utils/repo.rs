use crate::data::{EventRepository, RepoId};

/// Resolve the repository the pull request lives in. `GITHUB_REPOSITORY`
/// wins, then the payload's `full_name`, then its `html_url`.
pub fn resolve_repo(explicit: Option<&str>, payload: Option<&EventRepository>) -> Option<RepoId> {
    if let Some(repo) = explicit.and_then(parse_full_name) {
        return Some(repo);
    }

    let payload = payload?;
    payload
        .full_name
        .as_deref()
        .and_then(parse_full_name)
        .or_else(|| payload.html_url.as_deref().and_then(parse_github_url))
}

/// Parse `owner/repo`.
pub fn parse_full_name(full_name: &str) -> Option<RepoId> {
    let (owner, name) = full_name.trim().split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(RepoId {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

pub fn parse_github_url(url: &str) -> Option<RepoId> {
    // Handle SSH: git@github.com:owner/repo.git
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return split_path(path);
    }

    // Handle HTTPS: https://github.com/owner/repo(.git)
    if url.contains("github.com") {
        let path = url.split("github.com").nth(1)?;
        let path = path.trim_start_matches('/').trim_start_matches(':');
        return split_path(path);
    }

    None
}

fn split_path(path: &str) -> Option<RepoId> {
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');
    let owner = parts.next().filter(|p| !p.is_empty())?;
    let name = parts.next().filter(|p| !p.is_empty())?;
    Some(RepoId {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}
