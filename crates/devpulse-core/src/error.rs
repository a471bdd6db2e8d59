/// Errors that can occur across devpulse.
///
/// Each variant wraps a specific error domain. Library crates return this
/// type directly; the binary crate renders it through `miette` at the boundary.
///
/// # Examples
///
/// ```
/// use devpulse_core::DevpulseError;
///
/// let err = DevpulseError::DataSource("GitHub API error 404 Not Found: {}".into());
/// assert!(err.to_string().contains("404"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DevpulseError {
    /// The repository reference could not be normalized to `owner/name`.
    #[error("invalid repository reference '{0}': use owner/name or a full repository URL")]
    #[diagnostic(
        code(devpulse::invalid_reference),
        help("accepted forms: `owner/name` (e.g. vercel/next.js) or `https://github.com/owner/name`")
    )]
    InvalidReference(String),

    /// A retrieval from the data source failed or returned a non-success status.
    #[error("data source error: {0}")]
    #[diagnostic(code(devpulse::data_source))]
    DataSource(String),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(devpulse::config))]
    Config(String),

    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
