//! Core types, configuration, and error handling for devpulse.
//!
//! This crate provides the shared foundation used by the other devpulse crates:
//! - [`DevpulseError`] — unified error type using `thiserror` and `miette`
//! - [`DevpulseConfig`] — configuration loaded from `.devpulse.toml`
//! - [`RepositoryReference`] — canonical `owner/name`, produced by [`normalize`]
//! - Shared types: [`WeeklyPoint`], [`TimeSeries`], [`RepoMetrics`],
//!   [`WeekStart`], [`OutputFormat`]

mod config;
mod error;
mod reference;
mod types;

pub use config::{DevpulseConfig, GithubConfig, SeriesConfig};
pub use error::DevpulseError;
pub use reference::{normalize, RepositoryReference};
pub use types::{OutputFormat, RepoMetrics, TimeSeries, WeekStart, WeeklyPoint};

/// A convenience `Result` type for devpulse operations.
pub type Result<T> = std::result::Result<T, DevpulseError>;
