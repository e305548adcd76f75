//! URL handling module for linkchecker
//!
//! This module provides the link and host key types, the link normalizer
//! that turns raw `href` values into absolute links, and the ignore set.

mod host;
mod ignore;
mod normalize;

use std::fmt;
use url::Url;

// Re-export main functions
pub use host::host_key;
pub use ignore::IgnoreSet;
pub use normalize::{is_internal_link, LinkNormalizer};

/// The authority (`host[:port]`) of a link
///
/// Work is partitioned by this key: links sharing a key are fetched by one
/// worker, strictly one after another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostKey(String);

impl HostKey {
    /// Creates a key from an authority string, lowercasing it
    pub fn new(authority: &str) -> Self {
        Self(authority.to_lowercase())
    }

    pub fn from_url(url: &Url) -> Self {
        Self(host_key(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for links without an authority, such as `file:` URLs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<no host>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// An absolute link ready to be checked
///
/// Two links are the same link when their serialized URLs are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    url: Url,
    host: HostKey,
}

impl Link {
    pub fn new(url: Url) -> Self {
        let host = HostKey::from_url(&url);
        Self { url, host }
    }

    /// Parses an absolute URL string into a link
    pub fn parse(s: &str) -> Result<Self, url::ParseError> {
        Url::parse(s).map(Self::new)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn host(&self) -> &HostKey {
        &self.host
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
