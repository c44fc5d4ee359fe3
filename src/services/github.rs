use anyhow::{Context, Result};
use octocrab::Octocrab;
use serde::Serialize;
use std::error::Error as _;
use std::future::Future;
use std::path::Path;

use crate::data::{EventPayload, RepoId};

/// The one write the check performs against the pull request API.
pub trait PullRequestApi {
    /// Replace the pull request description. Returns the HTTP status code.
    fn update_pull_request(
        &self,
        repo: &RepoId,
        number: u64,
        title: Option<&str>,
        body: &str,
    ) -> impl Future<Output = Result<u16>>;
}

/// Octocrab-backed client. The underlying client is only built when a
/// request is actually made, so runs that never write need no TLS setup.
pub struct GitHubApi {
    token: String,
    api_url: Option<String>,
}

impl GitHubApi {
    pub fn new(token: &str, api_url: Option<&str>) -> Self {
        Self {
            token: token.to_string(),
            api_url: api_url.filter(|url| !url.is_empty()).map(String::from),
        }
    }

    fn client(&self) -> Result<Octocrab> {
        let mut builder = Octocrab::builder().personal_token(self.token.clone());
        if let Some(url) = &self.api_url {
            builder = builder
                .base_uri(url.as_str())
                .with_context(|| format!("Invalid GitHub API url: {}", url))?;
        }
        builder.build().context("Failed to build GitHub client")
    }
}

#[derive(Serialize)]
struct UpdatePullRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    body: &'a str,
}

impl PullRequestApi for GitHubApi {
    async fn update_pull_request(
        &self,
        repo: &RepoId,
        number: u64,
        title: Option<&str>,
        body: &str,
    ) -> Result<u16> {
        let route = format!("/repos/{}/{}/pulls/{}", repo.owner, repo.name, number);
        tracing::debug!(%route, "updating pull request description");

        // Raw request so a non-2xx answer comes back as a status instead of an error
        let response = self
            .client()?
            ._patch(route, Some(&UpdatePullRequest { title, body }))
            .await
            .map_err(request_error)
            .with_context(|| format!("Failed to update pull request #{} in {}", number, repo))?;

        Ok(response.status().as_u16())
    }
}

/// octocrab's Display appends a captured backtrace; keep only the causes.
fn request_error(err: octocrab::Error) -> anyhow::Error {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(without_backtrace(&cause.to_string()));
        source = cause.source();
    }

    if causes.is_empty() {
        return anyhow::anyhow!(without_backtrace(&err.to_string()));
    }
    anyhow::anyhow!(causes.join(": "))
}

fn without_backtrace(message: &str) -> String {
    message
        .split("Found at")
        .next()
        .unwrap_or_default()
        .trim_end()
        .to_string()
}

/// Read the webhook payload GitHub Actions stores for the triggering event.
pub fn load_event(path: &Path) -> Result<EventPayload> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event payload {}", path.display()))?;
    parse_event(&raw).with_context(|| format!("Malformed event payload {}", path.display()))
}

pub fn parse_event(raw: &str) -> Result<EventPayload> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// One-shot HTTP server: answers the first request with `status_line`
    /// and hands back the raw request it received.
    fn serve_once(status_line: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .filter_map(|line| line.split_once(':'))
                        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{{}}",
                status_line
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8(request).unwrap()
        });

        (url, handle)
    }

    fn acme() -> RepoId {
        RepoId {
            owner: "acme".to_string(),
            name: "web".to_string(),
        }
    }

    fn request_body(raw: &str) -> serde_json::Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn update_patches_the_pull_request() {
        let (url, server) = serve_once("200 OK");
        let api = GitHubApi::new("secret", Some(&url));
        let rt = tokio::runtime::Runtime::new().unwrap();

        let status = rt
            .block_on(api.update_pull_request(&acme(), 5, Some("[A-1] t"), "body"))
            .unwrap();

        assert_eq!(status, 200);
        let raw = server.join().unwrap();
        assert!(raw.starts_with("PATCH /repos/acme/web/pulls/5 HTTP/1.1\r\n"), "{raw}");
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer secret"));
        assert_eq!(
            request_body(&raw),
            serde_json::json!({"title": "[A-1] t", "body": "body"})
        );
    }

    #[test]
    fn rejected_update_comes_back_as_status() {
        let (url, server) = serve_once("422 Unprocessable Entity");
        let api = GitHubApi::new("secret", Some(&url));
        let rt = tokio::runtime::Runtime::new().unwrap();

        let status = rt.block_on(api.update_pull_request(&acme(), 5, None, "body"));

        assert_eq!(status.unwrap(), 422);
        let raw = server.join().unwrap();
        assert_eq!(request_body(&raw), serde_json::json!({"body": "body"}));
    }

    #[test]
    fn transport_failure_message_has_no_backtrace() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        // Accept and hang up without answering
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            drop(stream);
        });

        let api = GitHubApi::new("secret", Some(&url));
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(api.update_pull_request(&acme(), 5, None, "body"))
            .unwrap_err();
        server.join().unwrap();

        let message = format!("{err:#}");
        assert!(message.starts_with("Failed to update pull request #5 in acme/web: "), "{message}");
        assert!(!message.contains("Found at"), "{message}");
        assert!(!message.contains('\n'), "{message}");
    }

    #[test]
    fn parses_pull_request_event() {
        let payload = parse_event(
            r#"{
                "action": "opened",
                "number": 42,
                "pull_request": {
                    "number": 42,
                    "title": "[ABC-1] Login",
                    "body": null,
                    "labels": [{"id": 1, "name": "no-ticket", "color": "fff"}],
                    "draft": false
                },
                "repository": {"full_name": "acme/web", "html_url": "https://github.com/acme/web"}
            }"#,
        )
        .unwrap();

        let pr = payload.pull_request.unwrap();
        assert_eq!(pr.number, 42);
        assert_eq!(pr.title.as_deref(), Some("[ABC-1] Login"));
        assert_eq!(pr.body, None);
        assert!(pr.has_label("no-ticket"));
        assert_eq!(
            payload.repository.unwrap().full_name.as_deref(),
            Some("acme/web")
        );
    }

    #[test]
    fn missing_labels_default_to_empty() {
        let payload = parse_event(r#"{"pull_request": {"number": 3}}"#).unwrap();
        let pr = payload.pull_request.unwrap();
        assert!(pr.labels.is_empty());
        assert_eq!(pr.title, None);
    }

    #[test]
    fn non_pull_request_event_has_no_snapshot() {
        let payload = parse_event(r#"{"ref": "refs/heads/main"}"#).unwrap();
        assert!(payload.pull_request.is_none());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_event("{not json").is_err());
        assert!(parse_event(r#"{"pull_request": {"title": "x"}}"#).is_err());
    }

    #[test]
    fn backtrace_is_cut_from_messages() {
        assert_eq!(
            without_backtrace("Service Error: client error (Connect)\n\nFound at    0: snafu"),
            "Service Error: client error (Connect)"
        );
        assert_eq!(without_backtrace("Not Found"), "Not Found");
    }

    #[test]
    fn update_body_omits_missing_title() {
        let json = serde_json::to_value(UpdatePullRequest {
            title: None,
            body: "b",
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"body": "b"}));
    }
}
