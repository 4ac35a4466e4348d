//! Host primitive for opening a URL outside the application.

use tracing::debug;
use url::Url;

/// Browsing context the gate asks for: a new, unrelated one.
pub const OPEN_TARGET: &str = "_blank";

/// Window features: no opener back-reference, no referrer.
pub const OPEN_FEATURES: &str = "noopener,noreferrer";

/// Errors from the host opener.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// The href is not an absolute URL.
    #[error("refusing to open {url}: {source}")]
    InvalidUrl {
        /// Href as given.
        url: String,
        /// Parse failure.
        source: url::ParseError,
    },

    /// The platform browser could not be launched.
    #[error("failed to launch browser: {0}")]
    Launch(#[from] std::io::Error),
}

/// Opens URLs in an external browsing context.
pub trait ExternalOpener: Send + Sync {
    /// Open `url` with the given target and window features.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError`] if the host could not open the URL.
    fn open(&self, url: &str, target: &str, features: &str) -> Result<(), OpenError>;
}

/// Opens URLs with the platform's default browser.
///
/// Only absolute URLs are handed over, re-serialized from their parsed
/// form. The browser process never receives a referrer or opener handle,
/// so `target` and `features` are satisfied by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open(&self, url: &str, target: &str, features: &str) -> Result<(), OpenError> {
        let parsed = parse_target(url)?;
        debug!(url = %parsed, target, features, "opening external url");
        webbrowser::open(parsed.as_str())?;
        Ok(())
    }
}

/// Parse `url` into the absolute form handed to the browser.
///
/// # Errors
///
/// Returns [`OpenError::InvalidUrl`] for relative or malformed hrefs.
pub fn parse_target(url: &str) -> Result<Url, OpenError> {
    Url::parse(url.trim()).map_err(|source| OpenError::InvalidUrl {
        url: url.to_owned(),
        source,
    })
}
