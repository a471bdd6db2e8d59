//! GitHub data source for devpulse.
//!
//! Retrieves the repository summary and the most recent page of commits and
//! issues, concurrently, and hands them to the bucketing engine.

pub mod client;
pub mod metrics;
pub mod records;

pub use client::{GitHubClient, RepoActivity};
pub use metrics::{build_metrics, collect_metrics};
