//! Loading the document whose links are checked

use crate::checker::fetcher::with_tls_floor;
use crate::checker::parser::extract_links;
use crate::config::CheckerConfig;
use crate::LinkCheckError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

/// Where the document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSource {
    /// A local HTML file
    File(PathBuf),

    /// A page fetched over HTTP(S)
    Url(String),
}

impl LinkSource {
    /// Classifies a command-line argument
    ///
    /// An existing path that is not a directory is a file; anything else
    /// is treated as a URL.
    pub fn from_arg(arg: &str) -> Self {
        let path = Path::new(arg);
        match std::fs::metadata(path) {
            Ok(meta) if !meta.is_dir() => Self::File(path.to_path_buf()),
            _ => Self::Url(arg.to_string()),
        }
    }
}

/// A loaded document: its base URL and raw links
#[derive(Debug, Clone)]
pub struct SourcePage {
    /// URL that relative links are resolved against
    pub base: Url,

    /// Raw `href` values in document order
    pub links: Vec<String>,
}

/// Loads the document and extracts its links
///
/// # Errors
///
/// All failures here are fatal to the run:
/// * `ReadInput` - the local file could not be read
/// * `InvalidInput` - the argument is not a file and not an absolute URL
/// * `FetchPage` - the page could not be fetched or its body not read
pub async fn load_source(
    source: &LinkSource,
    config: &CheckerConfig,
) -> Result<SourcePage, LinkCheckError> {
    match source {
        LinkSource::File(path) => load_file(path).await,
        LinkSource::Url(url) => load_url(url, config).await,
    }
}

async fn load_file(path: &Path) -> Result<SourcePage, LinkCheckError> {
    let read_error = |source: std::io::Error| LinkCheckError::ReadInput {
        path: path.to_path_buf(),
        source,
    };

    let bytes = tokio::fs::read(path).await.map_err(read_error)?;
    let absolute = tokio::fs::canonicalize(path).await.map_err(read_error)?;
    let base = Url::from_file_path(&absolute).map_err(|()| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path cannot be expressed as a file URL",
        ))
    })?;

    let html = String::from_utf8_lossy(&bytes);
    let links = extract_links(&html);
    tracing::info!("Found {} link(s) in {}", links.len(), path.display());

    Ok(SourcePage { base, links })
}

async fn load_url(raw: &str, config: &CheckerConfig) -> Result<SourcePage, LinkCheckError> {
    let base = Url::parse(raw).map_err(|source| LinkCheckError::InvalidInput {
        input: raw.to_string(),
        source,
    })?;

    let builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout());
    let client = with_tls_floor(builder, config.min_tls).build()?;

    let fetch_error = |source: reqwest::Error| LinkCheckError::FetchPage {
        url: raw.to_string(),
        source,
    };

    let response = client
        .get(base.clone())
        .send()
        .await
        .map_err(fetch_error)?;

    let status = response.status();
    if status.as_u16() >= 400 {
        tracing::warn!("{} answered {}; checking its links anyway", raw, status);
    }

    let html = response.text().await.map_err(fetch_error)?;
    let links = extract_links(&html);
    tracing::info!("Found {} link(s) on {}", links.len(), base);

    Ok(SourcePage { base, links })
}
