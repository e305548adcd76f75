//! Output module for check results
//!
//! This module handles:
//! - The line format of per-link outcomes
//! - Sinks that receive outcomes as workers produce them
//! - The end-of-run summary

mod sinks;
pub mod stats;
mod traits;

pub use sinks::{CollectingSink, StdoutSink};
pub use stats::CheckSummary;
pub use traits::OutcomeSink;

use crate::checker::FetchOutcome;
use crate::url::Link;

/// Line printed when filtering leaves nothing to check
pub const NO_LINKS_MESSAGE: &str = "No links to check.";

/// Formats one outcome line
///
/// # Examples
///
/// ```
/// use linkchecker::checker::{FetchOutcome, NgReason};
/// use linkchecker::output::format_outcome;
/// use linkchecker::url::Link;
///
/// let link = Link::parse("http://a.test/x").unwrap();
/// assert_eq!(format_outcome(&link, &FetchOutcome::Ok), "[OK] http://a.test/x");
/// assert_eq!(
///     format_outcome(&link, &FetchOutcome::Ng(NgReason::Status(404))),
///     "[NG] http://a.test/x (status 404)"
/// );
/// ```
pub fn format_outcome(link: &Link, outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Ok => format!("[OK] {}", link),
        FetchOutcome::Ng(reason) => format!("[NG] {} ({})", link, reason),
    }
}
