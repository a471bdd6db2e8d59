//! Repository reference normalization.
//!
//! Reduces user-typed repository references (`owner/name`, full URLs,
//! scheme-less URLs, URLs carrying `.git`, query strings or fragments) to a
//! canonical `(owner, name)` pair before any network call is made.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DevpulseError;

/// Canonical host of the data source.
const HOST: &str = "github.com";

/// Canonical `(owner, name)` pair addressing one repository.
///
/// Both parts are non-empty and free of `/`, query or fragment remnants and
/// a trailing `.git`, so they can be used directly as URL path segments.
///
/// # Examples
///
/// ```
/// use devpulse_core::RepositoryReference;
///
/// let repo = RepositoryReference::parse("https://github.com/vercel/next.js.git").unwrap();
/// assert_eq!(repo.owner(), "vercel");
/// assert_eq!(repo.name(), "next.js");
/// assert_eq!(repo.to_string(), "vercel/next.js");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryReference {
    owner: String,
    name: String,
}

impl RepositoryReference {
    /// Normalize arbitrary text into a repository reference.
    ///
    /// Accepts `owner/name`, `github.com/owner/name`,
    /// `https://www.github.com/owner/name.git?tab=readme#top`, and text with
    /// junk glued in front of an embedded URL. Path segments past the name
    /// (`/tree/main/...`) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DevpulseError::InvalidReference`] when fewer than two
    /// non-empty path segments remain, or when the owner or name is a `.` or
    /// `..` dot segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use devpulse_core::RepositoryReference;
    ///
    /// let repo = RepositoryReference::parse("github.com/vercel/next.js?tab=readme").unwrap();
    /// assert_eq!(repo.to_string(), "vercel/next.js");
    ///
    /// assert!(RepositoryReference::parse("vercel").is_err());
    /// assert!(RepositoryReference::parse("/").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, DevpulseError> {
        let reject = || DevpulseError::InvalidReference(raw.trim().to_string());

        let text = raw.trim();
        if text.is_empty() {
            return Err(reject());
        }

        let text = after_host_marker(text);
        let text = strip_url_prefix(text);
        // A scheme that survived is a URL for some other host.
        if text.contains("://") {
            return Err(reject());
        }
        let text = strip_suffixes(text);

        let mut segments = text.split('/').filter(|s| !s.is_empty());
        let (Some(owner), Some(name)) = (segments.next(), segments.next()) else {
            return Err(reject());
        };

        let owner = owner.trim();
        let name = strip_archive_suffix(name.trim()).trim();
        if owner.is_empty() || name.is_empty() {
            return Err(reject());
        }
        // Dot segments would be collapsed when joined into a URL path.
        if is_dot_segment(owner) || is_dot_segment(name) {
            return Err(reject());
        }
        // An owner that still carries the host is a mangled URL, not an account.
        if owner.to_ascii_lowercase().contains(HOST) {
            return Err(reject());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Build a reference from parts that are already known to be canonical.
    ///
    /// The parts still go through [`RepositoryReference::parse`], so the same
    /// invariants hold.
    ///
    /// # Errors
    ///
    /// Returns [`DevpulseError::InvalidReference`] if the joined parts do not
    /// normalize back to exactly `owner` and `name`.
    pub fn new(owner: &str, name: &str) -> Result<Self, DevpulseError> {
        let joined = format!("{owner}/{name}");
        let parsed = Self::parse(&joined)?;
        if parsed.owner != owner || parsed.name != name {
            return Err(DevpulseError::InvalidReference(joined));
        }
        Ok(parsed)
    }

    /// Account or organization that owns the repository.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Free-function form of [`RepositoryReference::parse`].
///
/// # Errors
///
/// See [`RepositoryReference::parse`].
pub fn normalize(raw: &str) -> Result<RepositoryReference, DevpulseError> {
    RepositoryReference::parse(raw)
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryReference {
    type Err = DevpulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Everything after the first `github.com/`, wherever it appears.
fn after_host_marker(text: &str) -> &str {
    let marker = format!("{HOST}/");
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    match text.to_ascii_lowercase().find(&marker) {
        Some(idx) => &text[idx + marker.len()..],
        None => text,
    }
}

/// `[scheme://][www.]github.com/path` -> `path`; anything else is returned as is.
fn strip_url_prefix(text: &str) -> &str {
    let mut rest = text;
    for scheme in ["https://", "http://", "git://", "ssh://"] {
        if let Some(stripped) = strip_prefix_ignore_case(rest, scheme) {
            rest = stripped;
            break;
        }
    }
    if let Some(stripped) = strip_prefix_ignore_case(rest, "www.") {
        rest = stripped;
    }
    match strip_prefix_ignore_case(rest, HOST).and_then(|r| r.strip_prefix('/')) {
        Some(path) => path,
        None => text,
    }
}

/// Drop query string, fragment, archive suffix and surrounding slashes.
fn strip_suffixes(text: &str) -> &str {
    let text = match text.find(['?', '#']) {
        Some(idx) => &text[..idx],
        None => text,
    };
    let text = text.trim_end_matches('/');
    strip_archive_suffix(text).trim_matches('/')
}

fn is_dot_segment(part: &str) -> bool {
    part == "." || part == ".."
}

fn strip_archive_suffix(mut text: &str) -> &str {
    while let Some(stripped) = text.strip_suffix(".git") {
        text = stripped;
    }
    text
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}
