use crate::checker::FetchOutcome;
use crate::url::HostKey;
use std::time::Instant;

/// Tracks the state of one host during a run
///
/// Each host worker owns exactly one `HostState`; nothing else reads or
/// writes it until the worker hands it back on completion.
#[derive(Debug, Clone)]
pub struct HostState {
    /// The host this state belongs to
    pub host: HostKey,

    /// Number of requests completed against this host
    pub request_count: u32,

    /// Number of completed requests classified OK
    pub ok_count: u32,

    /// Number of completed requests classified NG
    pub ng_count: u32,

    /// When the most recent request to this host finished
    pub last_request_time: Option<Instant>,
}

impl HostState {
    pub fn new(host: HostKey) -> Self {
        Self {
            host,
            request_count: 0,
            ok_count: 0,
            ng_count: 0,
            last_request_time: None,
        }
    }

    /// Records a finished request and its outcome
    pub fn record(&mut self, outcome: &FetchOutcome, now: Instant) {
        self.request_count += 1;
        if outcome.is_ok() {
            self.ok_count += 1;
        } else {
            self.ng_count += 1;
        }
        self.last_request_time = Some(now);
    }
}
