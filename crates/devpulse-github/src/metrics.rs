//! Repository metrics: fetched records in, chart-ready series out.

use devpulse_core::{DevpulseError, RepoMetrics, RepositoryReference};
use devpulse_pulse::{aggregate, BucketOptions};
use tracing::info;

use crate::client::{GitHubClient, RepoActivity};

/// Fetch activity for `repo` and bucket it into weekly series.
///
/// The repository summary scalars are forwarded unchanged. Any failed read
/// fails the whole call; no partial series are returned.
///
/// # Errors
///
/// Returns [`DevpulseError::DataSource`] if any retrieval fails.
///
/// # Examples
///
/// ```no_run
/// use devpulse_core::{GithubConfig, RepositoryReference};
/// use devpulse_github::client::GitHubClient;
/// use devpulse_github::metrics::collect_metrics;
/// use devpulse_pulse::BucketOptions;
///
/// # async fn run() -> devpulse_core::Result<()> {
/// let client = GitHubClient::new(&GithubConfig::default())?;
/// let repo = RepositoryReference::parse("vercel/next.js")?;
/// let metrics = collect_metrics(&client, &repo, &BucketOptions::default()).await?;
/// println!("{}: {} weeks of commits", metrics.full_name, metrics.commit_frequency.len());
/// # Ok(())
/// # }
/// ```
pub async fn collect_metrics(
    client: &GitHubClient,
    repo: &RepositoryReference,
    options: &BucketOptions,
) -> Result<RepoMetrics, DevpulseError> {
    let activity = client.fetch_activity(repo).await?;
    let metrics = build_metrics(activity, options);
    info!(
        repo = %repo,
        commit_weeks = metrics.commit_frequency.len(),
        issue_weeks = metrics.issue_flow.len(),
        "metrics ready"
    );
    Ok(metrics)
}

/// Combine already-fetched activity into [`RepoMetrics`].
pub fn build_metrics(activity: RepoActivity, options: &BucketOptions) -> RepoMetrics {
    let series = aggregate(&activity.commits, &activity.issues, options);
    let repository = activity.repository;

    RepoMetrics {
        full_name: repository.full_name,
        stars: repository.stargazers_count,
        forks: repository.forks_count,
        open_issues: repository.open_issues_count,
        watchers: repository.subscribers_count,
        commit_frequency: series.commit_frequency,
        issue_flow: series.issue_flow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RepositoryRecord;
    use chrono::{TimeZone, Utc};
    use devpulse_core::WeeklyPoint;
    use devpulse_pulse::{IssueRecord, RawEvent};

    fn repository() -> RepositoryRecord {
        RepositoryRecord {
            full_name: "octo/cat".into(),
            stargazers_count: 10,
            forks_count: 2,
            open_issues_count: 5,
            subscribers_count: 3,
        }
    }

    #[test]
    fn scalars_pass_through() {
        let activity = RepoActivity {
            repository: repository(),
            commits: vec![],
            issues: vec![],
        };
        let metrics = build_metrics(activity, &BucketOptions::default());
        assert_eq!(metrics.full_name, "octo/cat");
        assert_eq!(metrics.stars, 10);
        assert_eq!(metrics.forks, 2);
        assert_eq!(metrics.open_issues, 5);
        assert_eq!(metrics.watchers, 3);
        assert!(metrics.commit_frequency.is_empty());
        assert!(metrics.issue_flow.is_empty());
    }

    #[test]
    fn series_come_from_engine() {
        let at = Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap();
        let activity = RepoActivity {
            repository: repository(),
            commits: vec![RawEvent::commit(at)],
            issues: vec![
                IssueRecord {
                    created: at,
                    closed: None,
                    is_pull_request: false,
                },
                IssueRecord {
                    created: at,
                    closed: Some(at),
                    is_pull_request: true,
                },
            ],
        };
        let metrics = build_metrics(activity, &BucketOptions::default());
        assert_eq!(metrics.commit_frequency, vec![WeeklyPoint::commits("3/10", 1)]);
        assert_eq!(metrics.issue_flow, vec![WeeklyPoint::issues("3/10", 1, 0)]);
    }
}
