//! Progress counters for a probing stage.
//!
//! Each stage keeps a shared snapshot of accepted/rejected counts that
//! workers update as items complete, so terminal reporting can observe
//! partial failure without per-channel detail.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Counters for one probing stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProgressSnapshot {
    /// Items submitted to the stage.
    pub total: usize,
    /// Items accepted so far.
    pub accepted: usize,
    /// Items rejected so far.
    pub rejected: usize,
}

impl ProgressSnapshot {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Items with an outcome so far.
    pub fn completed(&self) -> usize {
        self.accepted + self.rejected
    }

    /// Items still in flight or waiting for a worker.
    pub fn pending(&self) -> usize {
        self.total.saturating_sub(self.completed())
    }

    /// Completion percentage in [0, 100]; an empty stage reads as complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.completed() as f64 / self.total as f64 * 100.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed() >= self.total
    }
}

/// Shared progress state for concurrent access across probe workers.
pub type SharedProgress = Arc<RwLock<ProgressSnapshot>>;

/// Creates a new SharedProgress instance for a stage of `total` items.
pub fn new_shared_progress(total: usize) -> SharedProgress {
    Arc::new(RwLock::new(ProgressSnapshot::new(total)))
}
