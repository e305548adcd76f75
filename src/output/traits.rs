//! Output sink trait

use crate::checker::FetchOutcome;
use crate::url::Link;

/// Receives outcomes as host workers produce them
///
/// Workers on different hosts call `report` concurrently, so implementations
/// must be thread-safe and should emit each outcome as one unit. Outcomes of
/// different hosts may arrive in any interleaving; outcomes of one host
/// arrive in dispatch order.
pub trait OutcomeSink: Send + Sync {
    /// Records the outcome of checking one link
    ///
    /// # Arguments
    ///
    /// * `link` - The link that was fetched
    /// * `outcome` - Its OK/NG classification
    fn report(&self, link: &Link, outcome: &FetchOutcome);

    /// Called instead of any `report` when filtering left no links
    fn no_links(&self);
}
