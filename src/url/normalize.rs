use crate::url::{IgnoreSet, Link};
use std::collections::HashSet;
use url::{ParseError, Url};

/// Turns raw `href` values into the deduplicated list of links to check
///
/// # Normalization Steps
///
/// 1. Cut the fragment (everything from `#`); drop values left empty
/// 2. With internal exclusion on, drop values that carry no scheme
///    (judged on the raw string, before resolution)
/// 3. Resolve against the base URL; drop values that fail to resolve
/// 4. Drop links whose host is in the ignore set
/// 5. Keep the first occurrence of each resolved URL string
///
/// Dropped values are not errors. They are traced and skipped.
#[derive(Debug, Clone)]
pub struct LinkNormalizer<'a> {
    base: &'a Url,
    ignore: &'a IgnoreSet,
    exclude_internal: bool,
}

impl<'a> LinkNormalizer<'a> {
    pub fn new(base: &'a Url, ignore: &'a IgnoreSet) -> Self {
        Self {
            base,
            ignore,
            exclude_internal: false,
        }
    }

    /// Drops links that carry no scheme in the page source
    pub fn exclude_internal(mut self, exclude: bool) -> Self {
        self.exclude_internal = exclude;
        self
    }

    /// Normalizes raw links, preserving first-seen order
    ///
    /// # Examples
    ///
    /// ```
    /// use linkchecker::url::{IgnoreSet, LinkNormalizer};
    /// use url::Url;
    ///
    /// let base = Url::parse("http://a.test/").unwrap();
    /// let ignore = IgnoreSet::new();
    /// let links = LinkNormalizer::new(&base, &ignore)
    ///     .normalize(["/x", "http://a.test/x", "http://b.test/y", "#frag"]);
    ///
    /// let links: Vec<&str> = links.iter().map(|l| l.as_str()).collect();
    /// assert_eq!(links, ["http://a.test/x", "http://b.test/y"]);
    /// ```
    pub fn normalize<I, S>(&self, raw_links: I) -> Vec<Link>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for raw in raw_links {
            let raw = strip_fragment(raw.as_ref()).trim();
            if raw.is_empty() {
                continue;
            }

            if self.exclude_internal && is_internal_link(raw) {
                tracing::trace!("Skipping internal link {}", raw);
                continue;
            }

            let link = match self.base.join(raw) {
                Ok(url) => Link::new(url),
                Err(e) => {
                    tracing::trace!("Skipping unresolvable link {}: {}", raw, e);
                    continue;
                }
            };

            if self.ignore.contains(link.host()) {
                tracing::trace!("Skipping link on ignored host {}", link);
                continue;
            }

            if seen.insert(link.as_str().to_string()) {
                links.push(link);
            } else {
                tracing::trace!("Skipping duplicate link {}", link);
            }
        }

        links
    }
}

/// Returns true if a raw link carries no scheme of its own
///
/// Relative paths, scheme-relative references (`//host/path`) and bare
/// queries are internal. Values that are absolute but malformed are not
/// internal; they are dropped later when resolution fails.
pub fn is_internal_link(raw: &str) -> bool {
    matches!(Url::parse(raw), Err(ParseError::RelativeUrlWithoutBase))
}

fn strip_fragment(raw: &str) -> &str {
    match raw.find('#') {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}
