//! GitHub contents API publisher.
//!
//! One `PUT /repos/{owner}/{repo}/contents/{path}` per artifact. The file
//! is created on the configured branch; an existing remote file with the
//! same path is rejected by GitHub (no `sha` is sent) and surfaces as a
//! publish failure.

use anyhow::{Context, Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::blocking::Client;
use scenariogen_error::PipelineError;
use scenariogen_ports::Publisher;
use scenariogen_schema::PublishRecord;
use serde::Serialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_WEB_BASE: &str = "https://github.com";
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Clone, Debug)]
pub struct GithubPublisher {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// GitHub API base URL (for GHES). Default: https://api.github.com
    pub api_base: String,
    /// Browser base used for preview links. Default: https://github.com
    pub web_base: String,
    pub timeout_secs: u64,
}

#[derive(Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
}

impl GithubPublisher {
    pub fn new(token: String, owner: String, repo: String) -> Self {
        Self {
            token,
            owner,
            repo,
            branch: DEFAULT_BRANCH.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            timeout_secs: 30,
        }
    }

    fn client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(concat!("scenariogen/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .context("build reqwest client")
    }

    /// `{api_base}/repos/{owner}/{repo}/contents/{path}` with every segment percent-encoded.
    pub fn contents_url(&self, remote_path: &str) -> Result<Url> {
        let fixed = ["repos", self.owner.as_str(), self.repo.as_str(), "contents"];
        join_segments(&self.api_base, fixed.into_iter().chain(remote_path.split('/')))
    }

    fn put_contents(&self, record: &PublishRecord) -> std::result::Result<String, PipelineError> {
        let transport = |e: anyhow::Error| PipelineError::publish_transport(&e);

        let url = self.contents_url(&record.remote_path).map_err(transport)?;
        let body = PutContentsBody {
            message: &record.commit_message,
            content: STANDARD.encode(&record.content),
            branch: &record.branch,
        };

        tracing::debug!(%url, bytes = record.content.len(), "PUT contents");
        let resp = self
            .client()
            .map_err(transport)?
            .put(url.as_str())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .with_context(|| format!("PUT {url}"))
            .map_err(transport)?;

        let status = resp.status();
        if status.as_u16() != 200 && status.as_u16() != 201 {
            let text = resp.text().unwrap_or_default();
            return Err(PipelineError::publish_status(status.as_u16(), text));
        }

        if let Ok(json) = resp.json::<serde_json::Value>() {
            if let Some(sha) = json["commit"]["sha"].as_str() {
                tracing::debug!(sha, "commit created");
            }
        }

        Ok(self.preview_url(&record.remote_path))
    }
}

fn join_segments<'a>(base: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("parse base URL {base:?}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("base URL {base:?} cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl Publisher for GithubPublisher {
    fn branch(&self) -> &str {
        &self.branch
    }

    fn preview_url(&self, remote_path: &str) -> String {
        let fixed = [self.owner.as_str(), self.repo.as_str(), "blob"];
        let segments = fixed
            .into_iter()
            .chain(self.branch.split('/'))
            .chain(remote_path.split('/'));
        match join_segments(&self.web_base, segments) {
            Ok(url) => url.to_string(),
            Err(_) => format!(
                "{}/{}/{}/blob/{}/{}",
                self.web_base.trim_end_matches('/'),
                self.owner,
                self.repo,
                self.branch,
                remote_path
            ),
        }
    }

    fn publish(&self, record: &PublishRecord) -> std::result::Result<String, PipelineError> {
        self.put_contents(record)
    }
}
