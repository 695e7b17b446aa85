//! Concurrency planning for the probe worker pool.
//!
//! Derives the bounded worker count from configuration and CPU core count.

use itv_curator_config::Config;

/// Concurrency plan derived from configuration and system resources
#[derive(Debug, Clone, PartialEq)]
pub struct ConcurrencyPlan {
    /// Total logical CPU cores available
    pub total_cores: u32,
    /// Concurrent probe workers per stage
    pub workers: u32,
}

impl ConcurrencyPlan {
    /// Derive a concurrency plan from configuration
    ///
    /// Uses the following rules:
    /// - Detects CPU cores via num_cpus
    /// - Uses the explicit worker count when non-zero
    /// - Otherwise derives workers as 2x cores, clamped to [4, 32]
    pub fn derive(cfg: &Config) -> Self {
        let total_cores = num_cpus::get() as u32;

        let workers = if cfg.probe.workers > 0 {
            cfg.probe.workers
        } else {
            derive_workers(total_cores)
        };

        Self {
            total_cores,
            workers,
        }
    }
}

/// Derive worker count based on core count.
///
/// Probes are I/O-bound, so the pool runs wider than the core count but is
/// clamped to keep open sockets and child processes bounded.
fn derive_workers(cores: u32) -> u32 {
    (cores * 2).clamp(4, 32)
}

/// Public function to derive a concurrency plan from configuration
pub fn derive_plan(cfg: &Config) -> ConcurrencyPlan {
    ConcurrencyPlan::derive(cfg)
}
