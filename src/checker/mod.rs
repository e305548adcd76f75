//! Checker module for link extraction and reachability checks
//!
//! This module contains the core checking logic, including:
//! - Loading the input document and extracting its links
//! - HTTP fetching and OK/NG classification
//! - Per-host queues and serialized, rate-limited workers
//! - Overall run coordination

mod fetcher;
mod parser;
mod scheduler;
mod source;
mod worker;

pub use fetcher::{build_host_client, fetch_link, request_headers, FetchOutcome, NgReason};
pub use parser::extract_links;
pub use scheduler::{partition_by_host, HostBatch, HostScheduler};
pub use source::{load_source, LinkSource, SourcePage};
pub use worker::HostWorker;

use crate::config::CheckerConfig;
use crate::output::{CheckSummary, OutcomeSink};
use crate::url::{IgnoreSet, LinkNormalizer};
use crate::LinkCheckError;
use std::sync::Arc;
use url::Url;

/// Checks a set of raw links found on the page at `base`
///
/// The links are resolved, filtered and deduplicated first. If nothing is
/// left, the sink's `no_links` is called and no request is made. Otherwise
/// every link is checked exactly once and reported to `sink`; the call
/// returns only after the last outcome has been reported.
///
/// # Arguments
///
/// * `base` - URL that relative links are resolved against
/// * `raw_links` - Raw `href` values in document order
/// * `ignore` - Hosts whose links are skipped
/// * `config` - Run configuration
/// * `sink` - Receives each outcome as it is produced
pub async fn run_checks<S: AsRef<str>>(
    base: &Url,
    raw_links: &[S],
    ignore: &IgnoreSet,
    config: &CheckerConfig,
    sink: Arc<dyn OutcomeSink>,
) -> CheckSummary {
    let links = LinkNormalizer::new(base, ignore)
        .exclude_internal(config.exclude_internal)
        .normalize(raw_links);

    if links.is_empty() {
        tracing::info!("Nothing left to check after filtering");
        sink.no_links();
        return CheckSummary::new();
    }

    tracing::debug!(
        "{} raw link(s) reduced to {} unique link(s)",
        raw_links.len(),
        links.len()
    );

    HostScheduler::new(Arc::new(config.clone()), sink)
        .run(links)
        .await
}

/// Loads `source` and checks every link it contains
///
/// # Returns
///
/// * `Ok(CheckSummary)` - All links were checked (individual links may be NG)
/// * `Err(LinkCheckError)` - The document itself could not be loaded
pub async fn check_source(
    source: &LinkSource,
    ignore: &IgnoreSet,
    config: &CheckerConfig,
    sink: Arc<dyn OutcomeSink>,
) -> Result<CheckSummary, LinkCheckError> {
    let page = load_source(source, config).await?;
    Ok(run_checks(&page.base, &page.links, ignore, config, sink).await)
}
