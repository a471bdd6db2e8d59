//! Weekly commit-frequency and issue-flow series.
//!
//! Events are grouped by [`WeekKey`], ordered chronologically and truncated
//! to the most recent weeks. Weeks without activity are not synthesized, so a
//! series may skip calendar weeks.

use std::collections::BTreeMap;

use devpulse_core::{SeriesConfig, TimeSeries, WeekStart, WeeklyPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::{EventKind, IssueRecord, RawEvent};
use crate::weeks::{week_key, WeekKey};

/// Upper bound on the number of weeks in any series.
pub const MAX_WEEKS: usize = 12;

/// Options for bucketing.
///
/// # Examples
///
/// ```
/// use devpulse_core::WeekStart;
/// use devpulse_pulse::series::BucketOptions;
///
/// let opts = BucketOptions::default();
/// assert_eq!(opts.max_weeks, 12);
/// assert_eq!(opts.week_start, WeekStart::Sunday);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketOptions {
    /// Keep only the most recent N weeks (default: 12, clamped to `1..=12`).
    pub max_weeks: usize,
    /// Day that opens each week (default: Sunday).
    pub week_start: WeekStart,
}

impl Default for BucketOptions {
    fn default() -> Self {
        Self {
            max_weeks: 12,
            week_start: WeekStart::Sunday,
        }
    }
}

impl BucketOptions {
    /// Replace the window size, clamped to `1..=MAX_WEEKS`.
    ///
    /// # Examples
    ///
    /// ```
    /// use devpulse_pulse::series::BucketOptions;
    ///
    /// assert_eq!(BucketOptions::default().with_max_weeks(4).max_weeks, 4);
    /// assert_eq!(BucketOptions::default().with_max_weeks(50).max_weeks, 12);
    /// assert_eq!(BucketOptions::default().with_max_weeks(0).max_weeks, 1);
    /// ```
    #[must_use]
    pub fn with_max_weeks(self, max_weeks: usize) -> Self {
        Self {
            max_weeks: max_weeks.clamp(1, MAX_WEEKS),
            ..self
        }
    }
}

impl From<&SeriesConfig> for BucketOptions {
    fn from(config: &SeriesConfig) -> Self {
        Self {
            max_weeks: MAX_WEEKS,
            week_start: config.week_start,
        }
        .with_max_weeks(config.max_weeks)
    }
}

/// Per-week event counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekCounts {
    /// Commit events.
    pub commits: u64,
    /// Issue-opened events.
    pub opened: u64,
    /// Issue-closed events.
    pub closed: u64,
}

impl WeekCounts {
    fn record(&mut self, kind: EventKind) {
        match kind {
            EventKind::Commit => self.commits += 1,
            EventKind::IssueOpened => self.opened += 1,
            EventKind::IssueClosed => self.closed += 1,
        }
    }
}

/// The two chart-ready series produced from one batch of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySeries {
    /// Commits per week.
    pub commit_frequency: TimeSeries,
    /// Issues opened and closed per week.
    pub issue_flow: TimeSeries,
}

/// Count events per week, in chronological week order.
///
/// Every event lands in exactly one bucket and bumps exactly one counter.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use devpulse_core::WeekStart;
/// use devpulse_pulse::events::RawEvent;
/// use devpulse_pulse::series::count_by_week;
///
/// let events = [
///     RawEvent::commit(Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()),
///     RawEvent::commit(Utc.with_ymd_and_hms(2024, 3, 16, 20, 0, 0).unwrap()),
/// ];
/// let weeks = count_by_week(events, WeekStart::Sunday);
/// assert_eq!(weeks.len(), 1);
/// assert_eq!(weeks.values().next().unwrap().commits, 2);
/// ```
pub fn count_by_week(
    events: impl IntoIterator<Item = RawEvent>,
    week_start: WeekStart,
) -> BTreeMap<WeekKey, WeekCounts> {
    let mut weeks: BTreeMap<WeekKey, WeekCounts> = BTreeMap::new();
    for event in events {
        weeks
            .entry(week_key(event.timestamp, week_start))
            .or_default()
            .record(event.kind);
    }
    weeks
}

/// Build the commit-frequency and issue-flow series.
///
/// Only [`EventKind::Commit`] events in `commits` are counted. Issue records
/// flagged as pull requests are dropped before anything else. Each series is
/// sorted by week and keeps only the last `options.max_weeks` weeks that saw
/// activity. The window never exceeds [`MAX_WEEKS`] and never drops below one
/// week, whatever `options` says. Empty input yields empty series.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use devpulse_pulse::events::{IssueRecord, RawEvent};
/// use devpulse_pulse::series::{aggregate, BucketOptions};
///
/// let commits = [RawEvent::commit(Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap())];
/// let issues = [IssueRecord {
///     created: Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap(),
///     closed: Some(Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap()),
///     is_pull_request: false,
/// }];
///
/// let series = aggregate(&commits, &issues, &BucketOptions::default());
/// assert_eq!(series.commit_frequency.len(), 1);
/// assert_eq!(series.commit_frequency[0].label, "3/10");
/// assert_eq!(series.issue_flow.len(), 2);
/// assert_eq!(series.issue_flow[0].opened, Some(1));
/// assert_eq!(series.issue_flow[1].closed, Some(1));
/// ```
pub fn aggregate(
    commits: &[RawEvent],
    issues: &[IssueRecord],
    options: &BucketOptions,
) -> ActivitySeries {
    let commit_events = commits
        .iter()
        .copied()
        .filter(|e| e.kind == EventKind::Commit);
    let commit_weeks = count_by_week(commit_events, options.week_start);

    let pull_requests = issues.iter().filter(|i| i.is_pull_request).count();
    let issue_events = issues
        .iter()
        .filter(|i| !i.is_pull_request)
        .flat_map(IssueRecord::events);
    let issue_weeks = count_by_week(issue_events, options.week_start);
    let window = options.max_weeks.clamp(1, MAX_WEEKS);

    debug!(
        commits = commits.len(),
        issues = issues.len() - pull_requests,
        pull_requests,
        commit_weeks = commit_weeks.len(),
        issue_weeks = issue_weeks.len(),
        window,
        "bucketed activity"
    );

    let commit_frequency = most_recent(commit_weeks, window)
        .map(|(week, counts)| WeeklyPoint::commits(week.label(), counts.commits))
        .collect();

    let issue_flow = most_recent(issue_weeks, window)
        .map(|(week, counts)| WeeklyPoint::issues(week.label(), counts.opened, counts.closed))
        .collect();

    ActivitySeries {
        commit_frequency,
        issue_flow,
    }
}

/// The last `max_weeks` entries, still in ascending order.
fn most_recent(
    weeks: BTreeMap<WeekKey, WeekCounts>,
    max_weeks: usize,
) -> impl Iterator<Item = (WeekKey, WeekCounts)> {
    let skip = weeks.len().saturating_sub(max_weeks);
    weeks.into_iter().skip(skip)
}
