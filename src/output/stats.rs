//! Run statistics aggregated from host workers

use crate::state::HostState;

/// Summary of a finished run
///
/// Logged at the end of a run; per-link failures never change the exit code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of distinct hosts that received a worker
    pub hosts: usize,

    /// Number of links fetched
    pub checked: u32,

    /// Number of OK outcomes
    pub ok: u32,

    /// Number of NG outcomes
    pub ng: u32,

    /// Workers that ended abnormally; their remaining links produced no line
    pub lost_workers: usize,
}

impl CheckSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one finished worker's host state
    pub fn absorb(&mut self, state: &HostState) {
        self.hosts += 1;
        self.checked += state.request_count;
        self.ok += state.ok_count;
        self.ng += state.ng_count;
    }

    /// Records a worker that did not finish normally
    pub fn record_lost_worker(&mut self) {
        self.hosts += 1;
        self.lost_workers += 1;
    }

    /// Returns true if nothing was checked
    pub fn is_empty(&self) -> bool {
        self.checked == 0
    }

    /// Logs the summary at info level
    pub fn log(&self) {
        tracing::info!(
            "Checked {} link(s) on {} host(s): {} OK, {} NG",
            self.checked,
            self.hosts,
            self.ok,
            self.ng
        );
        if self.lost_workers > 0 {
            tracing::warn!("{} host worker(s) ended abnormally", self.lost_workers);
        }
    }
}
