use std::time::Duration;

use devpulse_core::{DevpulseError, GithubConfig, RepositoryReference};
use devpulse_pulse::{IssueRecord, RawEvent};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::records::{CommitRecord, IssueItem, RepositoryRecord};

/// GitHub REST client for the three reads devpulse needs.
///
/// Each listing fetches a single page; there is no pagination and no retry.
///
/// # Examples
///
/// ```
/// use devpulse_core::GithubConfig;
/// use devpulse_github::client::GitHubClient;
///
/// let client = GitHubClient::new(&GithubConfig::default()).unwrap();
/// assert_eq!(client.per_page(), 100);
/// ```
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: Url,
    token: Option<String>,
    per_page: u32,
}

/// Everything one metrics run reads from the data source.
#[derive(Debug, Clone)]
pub struct RepoActivity {
    /// Repository summary.
    pub repository: RepositoryRecord,
    /// Commit events, one per commit that carries an author date.
    pub commits: Vec<RawEvent>,
    /// Issue records, pull requests included and flagged.
    pub issues: Vec<IssueRecord>,
}

impl GitHubClient {
    /// Create a client from configuration.
    ///
    /// The token, if any, must already be resolved into `config.token`; the
    /// client never reads the environment.
    ///
    /// # Errors
    ///
    /// Returns [`DevpulseError::Config`] if `api_base` is not a usable base
    /// URL, or [`DevpulseError::DataSource`] if the HTTP client cannot be built
    /// (for example an invalid `user_agent`).
    pub fn new(config: &GithubConfig) -> Result<Self, DevpulseError> {
        let api_base = Url::parse(&config.api_base).map_err(|e| {
            DevpulseError::Config(format!("invalid GitHub api_base '{}': {e}", config.api_base))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(DevpulseError::Config(format!(
                "GitHub api_base '{}' cannot hold a path",
                config.api_base
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DevpulseError::DataSource(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base,
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            per_page: config.per_page.clamp(1, 100),
        })
    }

    /// Page size used for the commits and issues listings.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Whether requests carry an `Authorization` header.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Fetch the repository summary.
    ///
    /// # Errors
    ///
    /// Returns [`DevpulseError::DataSource`] on network, status or decoding errors.
    pub async fn get_repository(
        &self,
        repo: &RepositoryReference,
    ) -> Result<RepositoryRecord, DevpulseError> {
        let url = self.repo_url(repo, &[])?;
        self.get_json(url).await
    }

    /// Fetch the most recent page of commits.
    ///
    /// # Errors
    ///
    /// Returns [`DevpulseError::DataSource`] on network, status or decoding errors.
    pub async fn list_commits(
        &self,
        repo: &RepositoryReference,
    ) -> Result<Vec<CommitRecord>, DevpulseError> {
        let mut url = self.repo_url(repo, &["commits"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string());
        self.get_json(url).await
    }

    /// Fetch the most recent page of issues in any state (pull requests included).
    ///
    /// # Errors
    ///
    /// Returns [`DevpulseError::DataSource`] on network, status or decoding errors.
    pub async fn list_issues(
        &self,
        repo: &RepositoryReference,
    ) -> Result<Vec<IssueItem>, DevpulseError> {
        let mut url = self.repo_url(repo, &["issues"])?;
        url.query_pairs_mut()
            .append_pair("state", "all")
            .append_pair("per_page", &self.per_page.to_string());
        self.get_json(url).await
    }

    /// Fetch repository, commits and issues concurrently.
    ///
    /// All three must succeed; the first failure abandons the whole fetch.
    ///
    /// # Errors
    ///
    /// Returns the first [`DevpulseError::DataSource`] raised by any of the reads.
    pub async fn fetch_activity(
        &self,
        repo: &RepositoryReference,
    ) -> Result<RepoActivity, DevpulseError> {
        info!(repo = %repo, "fetching repository activity");

        let (repository, commits, issues) = tokio::try_join!(
            self.get_repository(repo),
            self.list_commits(repo),
            self.list_issues(repo),
        )?;

        let commit_count = commits.len();
        let commits: Vec<RawEvent> = commits.iter().filter_map(CommitRecord::to_event).collect();
        if commits.len() < commit_count {
            debug!(
                skipped = commit_count - commits.len(),
                "commits without an author date"
            );
        }
        let issues: Vec<IssueRecord> = issues.iter().map(IssueRecord::from).collect();

        debug!(
            repo = %repo,
            commits = commits.len(),
            issues = issues.len(),
            "fetched repository activity"
        );

        Ok(RepoActivity {
            repository,
            commits,
            issues,
        })
    }

    fn repo_url(&self, repo: &RepositoryReference, tail: &[&str]) -> Result<Url, DevpulseError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                DevpulseError::Config(format!("GitHub api_base '{}' cannot hold a path", self.api_base))
            })?
            .pop_if_empty()
            .extend(["repos", repo.owner(), repo.name()])
            .extend(tail);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DevpulseError> {
        debug!(url = %url, "GET");

        let mut request = self.http.get(url.clone());
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DevpulseError::DataSource(format!("failed to fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DevpulseError::DataSource(format!(
                "GitHub API error {status}: {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DevpulseError::DataSource(format!("failed to decode {url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_base(api_base: &str) -> GitHubClient {
        GitHubClient::new(&GithubConfig {
            api_base: api_base.into(),
            ..GithubConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn repo_url_appends_segments() {
        let client = client_with_base("https://api.github.com");
        let repo = RepositoryReference::new("vercel", "next.js").unwrap();
        let url = client.repo_url(&repo, &["commits"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/vercel/next.js/commits");
    }

    #[test]
    fn repo_url_keeps_enterprise_prefix() {
        let client = client_with_base("https://ghe.example.com/api/v3/");
        let repo = RepositoryReference::new("octo", "cat").unwrap();
        let url = client.repo_url(&repo, &[]).unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/octo/cat");
    }

    #[test]
    fn repo_url_encodes_odd_names() {
        let client = client_with_base("https://api.github.com");
        let repo = RepositoryReference::parse("some owner/na me").unwrap();
        let url = client.repo_url(&repo, &["issues"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/some%20owner/na%20me/issues"
        );
    }

    #[test]
    fn repo_url_keeps_owner_and_name_segments() {
        let client = client_with_base("https://api.github.com");
        for raw in ["vercel/..", "../next.js", "vercel/."] {
            assert!(RepositoryReference::parse(raw).is_err(), "{raw}");
        }
        let repo = RepositoryReference::parse("vercel/.next").unwrap();
        let url = client.repo_url(&repo, &["commits"]).unwrap();
        assert_eq!(
            url.path_segments().unwrap().collect::<Vec<_>>(),
            ["repos", "vercel", ".next", "commits"]
        );
    }

    #[test]
    fn per_page_is_clamped() {
        let client = GitHubClient::new(&GithubConfig {
            per_page: 500,
            ..GithubConfig::default()
        })
        .unwrap();
        assert_eq!(client.per_page(), 100);

        let client = GitHubClient::new(&GithubConfig {
            per_page: 0,
            ..GithubConfig::default()
        })
        .unwrap();
        assert_eq!(client.per_page(), 1);
    }

    #[test]
    fn blank_token_is_ignored() {
        let client = GitHubClient::new(&GithubConfig {
            token: Some("  ".into()),
            ..GithubConfig::default()
        })
        .unwrap();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn invalid_api_base_is_config_error() {
        let result = GitHubClient::new(&GithubConfig {
            api_base: "not a url".into(),
            ..GithubConfig::default()
        });
        assert!(matches!(result, Err(DevpulseError::Config(_))));

        let result = GitHubClient::new(&GithubConfig {
            api_base: "mailto:someone@example.com".into(),
            ..GithubConfig::default()
        });
        assert!(matches!(result, Err(DevpulseError::Config(_))));
    }
}
