//! Per-host worker
//!
//! A host worker drains one host's queue strictly in arrival order: fetch,
//! report, pause, next. It owns the only HTTP client (and cookie jar) that
//! ever talks to its host during a run.

use crate::checker::fetcher::{build_host_client, fetch_link, FetchOutcome, NgReason};
use crate::config::CheckerConfig;
use crate::output::OutcomeSink;
use crate::state::HostState;
use crate::url::{HostKey, Link};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};

/// Consumes the work queue of a single host
pub struct HostWorker {
    host: HostKey,
    queue: mpsc::Receiver<Link>,
    config: Arc<CheckerConfig>,
    sink: Arc<dyn OutcomeSink>,
    permits: Option<Arc<Semaphore>>,
}

impl HostWorker {
    /// Creates a worker bound to `queue`
    ///
    /// # Arguments
    ///
    /// * `host` - The host every queued link belongs to
    /// * `queue` - Receiving end of the host's work queue
    /// * `config` - Timeout, wait, user agent and TLS settings
    /// * `sink` - Where outcomes are reported
    /// * `permits` - Shared cap on concurrently draining workers, if any
    pub fn new(
        host: HostKey,
        queue: mpsc::Receiver<Link>,
        config: Arc<CheckerConfig>,
        sink: Arc<dyn OutcomeSink>,
        permits: Option<Arc<Semaphore>>,
    ) -> Self {
        Self {
            host,
            queue,
            config,
            sink,
            permits,
        }
    }

    /// Drains the queue until it is closed and empty
    ///
    /// After every fetch, whatever its outcome, the worker pauses for the
    /// full configured wait before taking the next link, including after the
    /// last one. With a concurrency cap, a permit is held only while the
    /// queue has work and is given back whenever the queue runs dry.
    /// Returns the host's final state.
    pub async fn run(mut self) -> HostState {
        let mut state = HostState::new(self.host.clone());

        let client = match build_host_client(&self.config) {
            Ok(client) => client,
            Err(e) => {
                tracing::error!("Failed to build HTTP client for {}: {}", self.host, e);
                self.fail_remaining(&mut state, &e.to_string()).await;
                return state;
            }
        };

        tracing::debug!("Worker for {} started", self.host);
        let wait = self.config.wait();

        while let Some(first) = self.queue.recv().await {
            let _permit = self.acquire_permit().await;

            let mut next = Some(first);
            while let Some(link) = next {
                tracing::debug!("Checking {}", link);
                let outcome = fetch_link(&client, &link).await;

                state.record(&outcome, Instant::now());
                self.sink.report(&link, &outcome);

                tokio::time::sleep(wait).await;
                next = self.queue.try_recv().ok();
            }
        }

        tracing::debug!(
            "Worker for {} finished after {} request(s)",
            self.host,
            state.request_count
        );
        state
    }

    /// Waits for a slot under the concurrency cap, if there is one
    async fn acquire_permit(&self) -> Option<OwnedSemaphorePermit> {
        match &self.permits {
            Some(permits) => permits.clone().acquire_owned().await.ok(),
            None => None,
        }
    }

    /// Reports every queued link as NG without sending any request
    async fn fail_remaining(&mut self, state: &mut HostState, reason: &str) {
        while let Some(link) = self.queue.recv().await {
            let outcome = FetchOutcome::Ng(NgReason::Transport(reason.to_string()));
            state.record(&outcome, Instant::now());
            self.sink.report(&link, &outcome);
        }
    }
}
