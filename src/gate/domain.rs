//! Hostname extraction from raw link targets.
//!
//! Malformed input is the common case here (in-page anchors, relative
//! paths, `mailto:` links) and yields `None` rather than an error.

use std::fmt;

use url::Url;

/// A lowercased, non-empty hostname.
///
/// Comparison is exact: `sub.github.com` and `github.com` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    /// Normalize a bare domain string (trim and lowercase).
    ///
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_ascii_lowercase()))
    }

    /// The hostname as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the owned hostname.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the hostname of an absolute URL.
///
/// Returns `None` when `href` is not an absolute URL or has no host.
pub fn extract_domain(href: &str) -> Option<Domain> {
    let parsed = Url::parse(href).ok()?;
    Domain::parse(parsed.host_str()?)
}
