use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One weekly bucket as handed to the charting layer.
///
/// `label` is a short rendering of the week's first day (`M/D`) and is not
/// meant for sorting; series are already in chronological order. Counters
/// that do not apply to a series are `None` and omitted from JSON.
///
/// # Examples
///
/// ```
/// use devpulse_core::WeeklyPoint;
///
/// let point = WeeklyPoint::commits("3/10", 4);
/// assert_eq!(point.commits, Some(4));
/// assert!(point.opened.is_none());
///
/// let json = serde_json::to_string(&point).unwrap();
/// assert_eq!(json, r#"{"label":"3/10","commits":4}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPoint {
    /// Human-readable week start, e.g. `"3/10"`.
    pub label: String,
    /// Commits authored during the week.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits: Option<u64>,
    /// Issues opened during the week.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened: Option<u64>,
    /// Issues closed during the week.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<u64>,
}

impl WeeklyPoint {
    /// A commit-frequency point.
    pub fn commits(label: impl Into<String>, commits: u64) -> Self {
        Self {
            label: label.into(),
            commits: Some(commits),
            opened: None,
            closed: None,
        }
    }

    /// An issue-flow point. Both counters are always present, possibly zero.
    pub fn issues(label: impl Into<String>, opened: u64, closed: u64) -> Self {
        Self {
            label: label.into(),
            commits: None,
            opened: Some(opened),
            closed: Some(closed),
        }
    }
}

/// Chronologically ordered weekly points, at most one per week.
pub type TimeSeries = Vec<WeeklyPoint>;

/// Repository summary plus the two weekly activity series.
///
/// The scalar fields are forwarded unchanged from the data source.
///
/// # Examples
///
/// ```
/// use devpulse_core::RepoMetrics;
///
/// let metrics = RepoMetrics {
///     full_name: "vercel/next.js".into(),
///     stars: 120_000,
///     forks: 25_000,
///     open_issues: 3_000,
///     watchers: 1_500,
///     commit_frequency: vec![],
///     issue_flow: vec![],
/// };
/// let json = serde_json::to_value(&metrics).unwrap();
/// assert_eq!(json["fullName"], "vercel/next.js");
/// assert!(json["commitFrequency"].as_array().unwrap().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoMetrics {
    /// `owner/name` as reported by the data source.
    pub full_name: String,
    /// Stargazer count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Open issues (GitHub counts open pull requests here too).
    pub open_issues: u64,
    /// Subscriber (watcher) count.
    pub watchers: u64,
    /// Commits per week, most recent weeks only.
    pub commit_frequency: TimeSeries,
    /// Issues opened and closed per week, most recent weeks only.
    pub issue_flow: TimeSeries,
}

/// Day of the week that opens each weekly bucket.
///
/// # Examples
///
/// ```
/// use devpulse_core::WeekStart;
///
/// let start: WeekStart = "mon".parse().unwrap();
/// assert_eq!(start, WeekStart::Monday);
/// assert_eq!(start.days_from_sunday(), 1);
/// assert_eq!(WeekStart::default(), WeekStart::Sunday);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl WeekStart {
    /// Offset from Sunday, `0..=6`.
    pub fn days_from_sunday(self) -> u32 {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
            WeekStart::Tuesday => 2,
            WeekStart::Wednesday => 3,
            WeekStart::Thursday => 4,
            WeekStart::Friday => 5,
            WeekStart::Saturday => 6,
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeekStart::Sunday => "sunday",
            WeekStart::Monday => "monday",
            WeekStart::Tuesday => "tuesday",
            WeekStart::Wednesday => "wednesday",
            WeekStart::Thursday => "thursday",
            WeekStart::Friday => "friday",
            WeekStart::Saturday => "saturday",
        };
        write!(f, "{name}")
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            "tuesday" | "tue" => Ok(WeekStart::Tuesday),
            "wednesday" | "wed" => Ok(WeekStart::Wednesday),
            "thursday" | "thu" => Ok(WeekStart::Thursday),
            "friday" | "fri" => Ok(WeekStart::Friday),
            "saturday" | "sat" => Ok(WeekStart::Saturday),
            other => Err(format!("unknown week start: {other}")),
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use devpulse_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
