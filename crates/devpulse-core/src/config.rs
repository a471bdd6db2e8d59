use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DevpulseError;
use crate::types::WeekStart;

/// Top-level configuration loaded from `.devpulse.toml`.
///
/// Resolved as `--config` path > `.devpulse.toml` in the working directory >
/// defaults. The GitHub token falls back to the environment only when the
/// file leaves it unset.
///
/// # Examples
///
/// ```
/// use devpulse_core::DevpulseConfig;
///
/// let config = DevpulseConfig::default();
/// assert_eq!(config.series.max_weeks, 12);
/// assert_eq!(config.default_repo, "vercel/next.js");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevpulseConfig {
    /// Repository used by `devpulse metrics` when none is given.
    #[serde(default = "default_repo")]
    pub default_repo: String,
    /// GitHub data source settings.
    #[serde(default)]
    pub github: GithubConfig,
    /// Weekly series shaping.
    #[serde(default)]
    pub series: SeriesConfig,
}

fn default_repo() -> String {
    "vercel/next.js".into()
}

impl Default for DevpulseConfig {
    fn default() -> Self {
        Self {
            default_repo: default_repo(),
            github: GithubConfig::default(),
            series: SeriesConfig::default(),
        }
    }
}

impl DevpulseConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DevpulseError::Io`] if the file cannot be read, or
    /// [`DevpulseError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use devpulse_core::DevpulseConfig;
    /// use std::path::Path;
    ///
    /// let config = DevpulseConfig::from_file(Path::new(".devpulse.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, DevpulseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DevpulseError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use devpulse_core::DevpulseConfig;
    ///
    /// let toml = r#"
    /// [series]
    /// max_weeks = 8
    /// "#;
    /// let config = DevpulseConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.series.max_weeks, 8);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, DevpulseError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// GitHub REST API settings.
///
/// # Examples
///
/// ```
/// use devpulse_core::GithubConfig;
///
/// let config = GithubConfig::default();
/// assert_eq!(config.api_base, "https://api.github.com");
/// assert_eq!(config.per_page, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Access token. The binary falls back to `GITHUB_TOKEN` / `GH_TOKEN`.
    pub token: Option<String>,
    /// Page size for the commits and issues listings (GitHub caps this at 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.github.com".into()
}

fn default_per_page() -> u32 {
    100
}

fn default_user_agent() -> String {
    "devpulse".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
            per_page: default_per_page(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Shape of the produced weekly series.
///
/// # Examples
///
/// ```
/// use devpulse_core::{SeriesConfig, WeekStart};
///
/// let config = SeriesConfig::default();
/// assert_eq!(config.max_weeks, 12);
/// assert_eq!(config.week_start, WeekStart::Sunday);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Number of most recent weeks kept in each series (default: 12, at most 12).
    #[serde(default = "default_max_weeks")]
    pub max_weeks: usize,
    /// Day that opens each weekly bucket (default: Sunday).
    #[serde(default)]
    pub week_start: WeekStart,
}

fn default_max_weeks() -> usize {
    12
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            max_weeks: default_max_weeks(),
            week_start: WeekStart::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = DevpulseConfig::default();
        assert_eq!(config.default_repo, "vercel/next.js");
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert!(config.github.token.is_none());
        assert_eq!(config.github.per_page, 100);
        assert_eq!(config.github.user_agent, "devpulse");
        assert_eq!(config.github.timeout_secs, 30);
        assert_eq!(config.series.max_weeks, 12);
        assert_eq!(config.series.week_start, WeekStart::Sunday);
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[github]
per_page = 50
"#;
        let config = DevpulseConfig::from_toml(toml).unwrap();
        assert_eq!(config.github.per_page, 50);
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.series.max_weeks, 12);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
default_repo = "rust-lang/rust"

[github]
api_base = "https://ghe.example.com/api/v3"
token = "ghp_test"
per_page = 30
user_agent = "pulse-bot"
timeout_secs = 5

[series]
max_weeks = 26
week_start = "monday"
"#;
        let config = DevpulseConfig::from_toml(toml).unwrap();
        assert_eq!(config.default_repo, "rust-lang/rust");
        assert_eq!(config.github.api_base, "https://ghe.example.com/api/v3");
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(config.github.per_page, 30);
        assert_eq!(config.github.user_agent, "pulse-bot");
        assert_eq!(config.github.timeout_secs, 5);
        assert_eq!(config.series.max_weeks, 26);
        assert_eq!(config.series.week_start, WeekStart::Monday);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = DevpulseConfig::from_toml("").unwrap();
        assert_eq!(config.default_repo, "vercel/next.js");
        assert_eq!(config.series.max_weeks, 12);
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = DevpulseConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_week_start_is_rejected() {
        let toml = r#"
[series]
week_start = "someday"
"#;
        assert!(DevpulseConfig::from_toml(toml).is_err());
    }
}
