use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub name: String,
}

/// The slice of a pull request the check looks at. Title and body may be
/// missing in the webhook payload, labels default to empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequestSnapshot {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl PullRequestSnapshot {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    pub full_name: Option<String>,
    pub html_url: Option<String>,
}

/// The webhook payload GitHub Actions writes to `GITHUB_EVENT_PATH`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub pull_request: Option<PullRequestSnapshot>,
    pub repository: Option<EventRepository>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
