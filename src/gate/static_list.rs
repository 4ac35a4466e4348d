//! Compiled-in domains that never need confirmation.
//!
//! Matched by exact hostname: `www.github.com` is not covered by
//! `github.com`.

use super::domain::Domain;

/// Well-known destinations that are always trusted regardless of user config.
const STATIC_TRUSTED_DOMAINS: &[&str] = &[
    // Code hosting
    "github.com",
    "gitlab.com",
    // Search
    "google.com",
    // Social and community
    "sspai.com",
    "x.com",
    "twitter.com",
    "diygod.me",
    "diygod.cc",
    "v2ex.com",
    "pixiv.net",
    // Video and audio
    "youtube.com",
    "bilibili.com",
    "xiaoyuzhoufm.com",
    // Blogging and feeds
    "xlog.app",
    "rss3.io",
];

/// Returns `true` if `domain` is on the static trust list.
pub fn is_static_trusted(domain: &Domain) -> bool {
    STATIC_TRUSTED_DOMAINS.contains(&domain.as_str())
}

/// All statically trusted domains, in declaration order.
pub fn static_trusted_domains() -> &'static [&'static str] {
    STATIC_TRUSTED_DOMAINS
}
