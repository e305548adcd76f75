use crate::checker::FetchOutcome;
use crate::output::{format_outcome, OutcomeSink, NO_LINKS_MESSAGE};
use crate::url::Link;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Writes outcome lines to standard output
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }

    fn write_line(&self, line: &str) {
        // One locked write per line keeps concurrent workers from splicing output
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = writeln!(handle, "{}", line) {
            tracing::error!("Failed to write to stdout: {}", e);
        }
    }
}

impl OutcomeSink for StdoutSink {
    fn report(&self, link: &Link, outcome: &FetchOutcome) {
        self.write_line(&format_outcome(link, outcome));
    }

    fn no_links(&self) {
        self.write_line(NO_LINKS_MESSAGE);
    }
}

/// Keeps outcomes in memory, in the order they were reported
#[derive(Debug, Default)]
pub struct CollectingSink {
    outcomes: Mutex<Vec<(Link, FetchOutcome)>>,
    no_links: AtomicBool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every outcome reported so far
    pub fn outcomes(&self) -> Vec<(Link, FetchOutcome)> {
        self.lock().clone()
    }

    /// Returns the outcomes rendered as output lines
    pub fn lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|(link, outcome)| format_outcome(link, outcome))
            .collect()
    }

    /// Returns true if the run reported that there was nothing to check
    pub fn saw_no_links(&self) -> bool {
        self.no_links.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Link, FetchOutcome)>> {
        // A panicking reporter cannot leave the Vec half-written
        self.outcomes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OutcomeSink for CollectingSink {
    fn report(&self, link: &Link, outcome: &FetchOutcome) {
        self.lock().push((link.clone(), outcome.clone()));
    }

    fn no_links(&self) {
        self.no_links.store(true, Ordering::SeqCst);
    }
}
