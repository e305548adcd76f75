use crate::url::HostKey;
use crate::LinkCheckError;
use std::collections::HashSet;
use std::path::Path;

/// Hosts whose links are dropped before scheduling
///
/// Loaded once before a run and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    hosts: HashSet<String>,
}

impl IgnoreSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an ignore file: one host per line, blank lines skipped
    ///
    /// There is no comment syntax; every non-blank line is a host.
    ///
    /// # Errors
    ///
    /// Returns `LinkCheckError::IgnoreFile` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, LinkCheckError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| LinkCheckError::IgnoreFile {
                path: path.to_path_buf(),
                source,
            })?;

        let set = Self::parse(&content);
        tracing::debug!("Loaded {} ignored host(s) from {}", set.len(), path.display());
        Ok(set)
    }

    /// Parses ignore file content
    pub fn parse(content: &str) -> Self {
        content.lines().collect()
    }

    /// Adds a host; entries are lowercased like parsed URL hosts
    pub fn insert(&mut self, host: &str) {
        let host = host.trim();
        if !host.is_empty() {
            self.hosts.insert(host.to_lowercase());
        }
    }

    pub fn contains(&self, host: &HostKey) -> bool {
        self.hosts.contains(host.as_str())
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for host in iter {
            set.insert(host);
        }
        set
    }
}
