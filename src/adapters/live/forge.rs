//! Live adapter for the `PullRequestHost` port using the GitHub REST API.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::ports::forge::{PullRequest, PullRequestFuture, PullRequestHost};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Opens pull requests through `POST /repos/{owner}/{repo}/pulls`.
pub struct GitHubPullRequests {
    client: Client,
    api_url: String,
    token: String,
}

impl GitHubPullRequests {
    /// Creates a client authenticating with `token` against `api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_url: api_url.into(), token: token.into() })
    }

    fn pulls_url(&self, repo: &str) -> String {
        format!("{}/repos/{repo}/pulls", self.api_url)
    }
}

/// The part of the created pull request we use.
#[derive(Deserialize)]
struct CreatedPullRequest {
    html_url: String,
}

impl GitHubPullRequests {
    async fn open(
        &self,
        repo: &str,
        pull: &PullRequest,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let response = self
            .client
            .post(self.pulls_url(repo))
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, concat!("taskpilot/", env!("CARGO_PKG_VERSION")))
            .json(pull)
            .send()
            .await
            .map_err(|e| format!("GitHub API request failed: {e}"))?;

        let status = response.status();
        let text = response.text().await?;
        if status != StatusCode::CREATED {
            return Err(format!("HTTP {}: {text}", status.as_u16()).into());
        }

        let created: CreatedPullRequest =
            serde_json::from_str(&text).map_err(|e| format!("unexpected GitHub response: {e}"))?;
        Ok(created.html_url)
    }
}

impl PullRequestHost for GitHubPullRequests {
    fn create_pull_request<'a>(
        &'a self,
        repo: &'a str,
        pull: &'a PullRequest,
    ) -> PullRequestFuture<'a> {
        Box::pin(self.open(repo, pull))
    }
}
