use crate::error::{ChurnError, Result};
use crate::model::{Commit, Release};
use log::warn;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const PER_PAGE: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Split an `owner/name` slug into its two components.
pub fn parse_repo_slug(slug: &str) -> Result<(String, String)> {
    let trimmed = slug.trim().trim_end_matches(".git");
    let mut parts = trimmed.splitn(2, '/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo))
            if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
        {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ChurnError::InvalidRepo(format!(
            "expected owner/name, got '{slug}'"
        ))),
    }
}

pub struct GithubClient {
    http: Client,
    base: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(owner: &str, repo: &str, api_base: &str, token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("churnmap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base: api_base.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// One GET against the API. A 2xx response decodes as JSON; anything else
    /// becomes `ChurnError::Api` carrying the status and body text.
    async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChurnError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Fetch up to `limit` releases, newest first, in pages of 100. Any
    /// request failure ends pagination early; whatever was accumulated is
    /// returned as-is.
    pub async fn list_releases(&self, limit: usize) -> Vec<Release> {
        let mut releases: Vec<Release> = Vec::new();
        let mut page = 1;

        while releases.len() < limit {
            let url = format!(
                "{}/repos/{}/{}/releases?per_page={}&page={}",
                self.base, self.owner, self.repo, PER_PAGE, page
            );
            match self.get_page::<Vec<Release>>(&url).await {
                Ok(batch) => {
                    if batch.is_empty() {
                        break;
                    }
                    releases.extend(batch);
                    page += 1;
                }
                Err(err) => {
                    warn!(
                        "failed to fetch releases page {page} for {}/{}: {err}",
                        self.owner, self.repo
                    );
                    break;
                }
            }
        }

        releases.truncate(limit);
        releases
    }

    /// Fetch every commit reachable from `reference`, in pages of 100, until
    /// an empty page. A non-2xx response ends pagination with the partial
    /// accumulation; a transport failure is returned as an error so callers
    /// can attribute it to the reference.
    pub async fn list_commits(&self, reference: &str) -> Result<Vec<Commit>> {
        let mut commits: Vec<Commit> = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/commits?sha={}&per_page={}&page={}",
                self.base, self.owner, self.repo, reference, PER_PAGE, page
            );
            match self.get_page::<Vec<Commit>>(&url).await {
                Ok(batch) => {
                    if batch.is_empty() {
                        break;
                    }
                    commits.extend(batch);
                    page += 1;
                }
                Err(ChurnError::Api { status, body }) => {
                    warn!("failed to fetch commits for {reference}: {status}, {body}");
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(commits)
    }
}
