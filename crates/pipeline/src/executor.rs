//! Probe executor.
//!
//! Runs an arbitrary probe function over a channel set with concurrency
//! bounded by a semaphore-gated worker pool, collecting one outcome per
//! submitted channel and keeping live progress counters as items complete.

use crate::channel::Channel;
use crate::probe::{ErrorKind, ProbeOutcome};
use crate::progress::SharedProgress;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Executes probes over a bounded worker pool.
///
/// Every submitted channel yields exactly one outcome, in submission order:
/// completion order is never observable through the result, and a probe that
/// panics is converted into a rejected outcome rather than dropped.
pub struct ProbeExecutor {
    /// Semaphore bounding in-flight probes
    semaphore: Arc<Semaphore>,
    /// Worker limit the semaphore was created with
    workers: u32,
    /// Shared progress counters updated as items complete
    progress: SharedProgress,
}

impl ProbeExecutor {
    /// Create an executor with the given worker limit.
    ///
    /// A zero limit is treated as one worker; the pool never runs unbounded.
    pub fn new(workers: u32, progress: SharedProgress) -> Self {
        let workers = workers.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(workers as usize)),
            workers,
            progress,
        }
    }

    /// Get the worker limit.
    pub fn workers(&self) -> u32 {
        self.workers
    }

    /// Get the number of available permits (slots for concurrent probes).
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run the probe over all channels and collect every outcome.
    ///
    /// Each channel is probed in its own task gated by a semaphore permit.
    /// The returned vector has exactly one entry per submitted channel, in
    /// submission order. There is no early-cancel switch: every item runs to
    /// completion, bounded only by the probe's own timeout.
    pub async fn run<F, Fut>(&self, channels: Vec<Channel>, probe: F) -> Vec<ProbeOutcome>
    where
        F: Fn(Channel) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = ProbeOutcome> + Send + 'static,
    {
        let mut handles = Vec::with_capacity(channels.len());

        for channel in channels {
            let semaphore = self.semaphore.clone();
            let progress = self.progress.clone();
            let probe = probe.clone();
            // Kept outside the task to synthesize an outcome if it panics
            let submitted = channel.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore should not be closed");

                let outcome = probe(channel).await;
                record_outcome(&progress, &outcome).await;
                outcome
            });

            handles.push((submitted, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (submitted, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(join_err) => {
                    tracing::debug!(
                        channel = %submitted.name,
                        error = %join_err,
                        "probe task died; synthesizing rejection"
                    );
                    let outcome = ProbeOutcome::rejected(submitted, ErrorKind::Unreachable);
                    record_outcome(&self.progress, &outcome).await;
                    outcomes.push(outcome);
                }
            }
        }

        outcomes
    }
}

/// Update the shared counters for one completed item.
async fn record_outcome(progress: &SharedProgress, outcome: &ProbeOutcome) {
    let mut snapshot = progress.write().await;
    if outcome.is_accepted() {
        snapshot.accepted += 1;
    } else {
        snapshot.rejected += 1;
    }
    if let Some(kind) = outcome.error {
        tracing::debug!(
            channel = %outcome.channel.name,
            url = %outcome.channel.url,
            reason = %kind,
            "channel rejected"
        );
    }
}
