//! Wire shapes of the GitHub REST responses devpulse reads.
//!
//! Only the fields the metrics need are decoded; everything else in the
//! payloads is ignored.

use chrono::{DateTime, Utc};
use devpulse_pulse::{IssueRecord, RawEvent};
use serde::Deserialize;

/// `GET /repos/{owner}/{repo}`: summary scalars passed through to the output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryRecord {
    pub full_name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub subscribers_count: u64,
}

/// One entry of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    #[serde(default)]
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub author: Option<GitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitSignature {
    pub date: Option<DateTime<Utc>>,
}

impl CommitRecord {
    /// Author date, when the payload carries one.
    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|a| a.date)
    }

    /// The commit as a bucketing event.
    pub fn to_event(&self) -> Option<RawEvent> {
        self.authored_at().map(RawEvent::commit)
    }
}

/// One entry of `GET /repos/{owner}/{repo}/issues?state=all`.
///
/// The issues endpoint also lists pull requests; those carry a
/// `pull_request` object.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueItem {
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl From<&IssueItem> for IssueRecord {
    fn from(item: &IssueItem) -> Self {
        Self {
            created: item.created_at,
            closed: item.closed_at,
            is_pull_request: item.pull_request.is_some(),
        }
    }
}
