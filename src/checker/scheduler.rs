//! Host-partitioned scheduler
//!
//! This module handles:
//! - Partitioning links by host, keeping per-host arrival order
//! - One bounded work queue and one worker task per distinct host
//! - Closing every queue once dispatch is done
//! - Waiting for all workers before returning the run summary
//!
//! Hosts run in parallel; within a host, fetches are strictly serialized by
//! the host's single worker.

use crate::checker::worker::HostWorker;
use crate::config::CheckerConfig;
use crate::output::{CheckSummary, OutcomeSink};
use crate::state::HostState;
use crate::url::{HostKey, Link};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

/// The links of one host, in dispatch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBatch {
    pub host: HostKey,
    pub links: Vec<Link>,
}

/// Groups links by host
///
/// Hosts appear in the order they are first seen; each batch keeps the
/// relative order of its links. No global order across hosts is kept.
pub fn partition_by_host(links: &[Link]) -> Vec<HostBatch> {
    let mut index: HashMap<&HostKey, usize> = HashMap::new();
    let mut batches: Vec<HostBatch> = Vec::new();

    for link in links {
        match index.get(link.host()) {
            Some(&i) => batches[i].links.push(link.clone()),
            None => {
                index.insert(link.host(), batches.len());
                batches.push(HostBatch {
                    host: link.host().clone(),
                    links: vec![link.clone()],
                });
            }
        }
    }

    batches
}

/// Queues and workers created so far
struct Dispatch {
    queues: HashMap<HostKey, mpsc::Sender<Link>>,
    workers: JoinSet<HostState>,
    closed: bool,
}

/// Scheduler that runs one serialized worker per host
///
/// `dispatch` takes `&self` and may be called from several tasks at once:
/// the host-to-queue map is guarded so that two dispatchers never create
/// two queues for the same host.
pub struct HostScheduler {
    config: Arc<CheckerConfig>,
    sink: Arc<dyn OutcomeSink>,
    permits: Option<Arc<Semaphore>>,
    dispatch: Mutex<Dispatch>,
}

impl HostScheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - Timeout, wait, user agent, queue and concurrency settings
    /// * `sink` - Receives every outcome the workers produce
    pub fn new(config: Arc<CheckerConfig>, sink: Arc<dyn OutcomeSink>) -> Self {
        let permits = config
            .max_concurrent_hosts
            .map(|max| Arc::new(Semaphore::new(max.min(Semaphore::MAX_PERMITS))));

        Self {
            config,
            sink,
            permits,
            dispatch: Mutex::new(Dispatch {
                queues: HashMap::new(),
                workers: JoinSet::new(),
                closed: false,
            }),
        }
    }

    /// Checks every link and waits until all of them have been reported
    ///
    /// Links are partitioned up front so each host queue is created with
    /// room for all of its links; dispatch then never waits on a slow host.
    pub async fn run(self, links: Vec<Link>) -> CheckSummary {
        let batches = partition_by_host(&links);
        tracing::info!(
            "Checking {} link(s) across {} host(s)",
            links.len(),
            batches.len()
        );

        for batch in &batches {
            self.open_queue(&batch.host, batch.links.len());
        }

        for link in links {
            self.dispatch(link).await;
        }

        self.join().await
    }

    /// Enqueues a link on its host's queue, creating queue and worker on first use
    ///
    /// Waits while the queue is full. Links dispatched after `close` are
    /// dropped with a warning.
    pub async fn dispatch(&self, link: Link) {
        let Some(sender) = self.open_queue(link.host(), self.config.queue_capacity) else {
            tracing::warn!("Scheduler is closed; {} will not be checked", link);
            return;
        };

        if let Err(mpsc::error::SendError(link)) = sender.send(link).await {
            tracing::warn!("Worker for {} is gone; {} will not be checked", link.host(), link);
        }
    }

    /// Returns the sender for `host`, spawning its worker if needed
    ///
    /// Returns None once the scheduler is closed.
    fn open_queue(&self, host: &HostKey, capacity: usize) -> Option<mpsc::Sender<Link>> {
        let mut dispatch = self.lock();
        if dispatch.closed {
            return None;
        }

        if let Some(sender) = dispatch.queues.get(host) {
            return Some(sender.clone());
        }

        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        let (sender, receiver) = mpsc::channel(capacity);
        let worker = HostWorker::new(
            host.clone(),
            receiver,
            self.config.clone(),
            self.sink.clone(),
            self.permits.clone(),
        );
        dispatch.workers.spawn(worker.run());
        dispatch.queues.insert(host.clone(), sender.clone());
        tracing::debug!("Opened queue for {} (capacity {})", host, capacity);

        Some(sender)
    }

    /// Closes every queue; workers finish what was already enqueued
    pub fn close(&self) {
        let mut dispatch = self.lock();
        dispatch.closed = true;
        dispatch.queues.clear();
    }

    /// Number of host queues created so far
    pub fn host_count(&self) -> usize {
        self.lock().workers.len()
    }

    /// Closes all queues and waits for every worker to terminate
    pub async fn join(&self) -> CheckSummary {
        self.close();
        let mut workers = std::mem::take(&mut self.lock().workers);

        let mut summary = CheckSummary::new();
        while let Some(result) = workers.join_next().await {
            match result {
                Ok(state) => summary.absorb(&state),
                Err(e) => {
                    tracing::error!("Host worker ended abnormally: {}", e);
                    summary.record_lost_worker();
                }
            }
        }

        summary
    }

    fn lock(&self) -> MutexGuard<'_, Dispatch> {
        self.dispatch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
