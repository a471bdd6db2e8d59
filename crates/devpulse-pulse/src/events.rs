//! Raw activity events fed to the bucketing engine.
//!
//! Records come from the data source already decoded; this module only gives
//! them a shape the engine can count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a single activity event.
///
/// # Examples
///
/// ```
/// use devpulse_pulse::events::EventKind;
///
/// let kind = EventKind::IssueOpened;
/// assert_eq!(serde_json::to_string(&kind).unwrap(), "\"issueOpened\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// A commit, dated by its author date.
    Commit,
    /// An issue was created.
    IssueOpened,
    /// An issue was closed.
    IssueClosed,
}

/// A timestamped activity event.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use devpulse_pulse::events::{EventKind, RawEvent};
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 12, 9, 30, 0).unwrap();
/// let event = RawEvent::commit(at);
/// assert_eq!(event.kind, EventKind::Commit);
/// assert_eq!(event.timestamp, at);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Instant the event happened.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub kind: EventKind,
}

impl RawEvent {
    /// A commit event at `timestamp`.
    pub fn commit(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            kind: EventKind::Commit,
        }
    }
}

/// One issue-tracker record as returned by the data source.
///
/// GitHub lists pull requests in the issues endpoint; those carry
/// `is_pull_request = true` and are skipped by the engine.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use devpulse_pulse::events::{EventKind, IssueRecord};
///
/// let issue = IssueRecord {
///     created: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
///     closed: Some(Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap()),
///     is_pull_request: false,
/// };
/// let kinds: Vec<_> = issue.events().map(|e| e.kind).collect();
/// assert_eq!(kinds, vec![EventKind::IssueOpened, EventKind::IssueClosed]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    /// Creation instant.
    pub created: DateTime<Utc>,
    /// Closing instant, if the issue is closed.
    pub closed: Option<DateTime<Utc>>,
    /// Whether the record is actually a pull request.
    pub is_pull_request: bool,
}

impl IssueRecord {
    /// The opened event, followed by the closed event when there is one.
    ///
    /// Pull requests yield the same events; filtering them is the caller's job.
    pub fn events(&self) -> impl Iterator<Item = RawEvent> {
        let opened = RawEvent {
            timestamp: self.created,
            kind: EventKind::IssueOpened,
        };
        let closed = self.closed.map(|timestamp| RawEvent {
            timestamp,
            kind: EventKind::IssueClosed,
        });
        std::iter::once(opened).chain(closed)
    }
}
