//! Two-stage pipeline orchestration.
//!
//! Runs the speed stage over the full channel set, hands the accepted
//! survivors to the resolution stage once the first stage has fully
//! completed, then merges and caps the final survivors. The hand-off
//! between stages is in-memory and typed; the barrier between stages is
//! explicit.

use crate::channel::{Channel, RankedChannel};
use crate::concurrency::{derive_plan, ConcurrencyPlan};
use crate::executor::ProbeExecutor;
use crate::merge::{apply_caps, merge, CategoryCaps, MergeOptions, MergedList};
use crate::progress::{new_shared_progress, ProgressSnapshot, SharedProgress};
use crate::resolution::{probe_resolution, ResolutionProbeConfig};
use crate::speed::{probe_speed, SpeedProbeConfig};
use crate::startup::{run_startup_checks, StartupError};
use itv_curator_config::{Config, ConfigError};
use std::path::Path;
use thiserror::Error;

/// Error type for pipeline construction
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Startup check failed
    #[error("Startup check failed: {0}")]
    Startup(#[from] StartupError),

    /// HTTP client construction failed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Summary of one full pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Channels submitted to the speed stage.
    pub total: usize,
    /// Channels that survived the speed stage.
    pub speed_accepted: usize,
    /// Channels that survived the resolution stage.
    pub resolution_accepted: usize,
    /// Speed survivors in rank order, with their metric.
    pub ranked: Vec<RankedChannel>,
    /// Resolution survivors in rank order, speed metric retained.
    pub survivors: Vec<RankedChannel>,
    /// Full categorized list, uncapped.
    pub merged: MergedList,
    /// Categorized list with per-prefix caps applied.
    pub curated: MergedList,
}

/// The probe-and-curate pipeline.
///
/// Holds the configuration, the derived concurrency plan, one HTTP client
/// shared by all speed probes, and the per-stage progress state observed by
/// terminal reporting.
pub struct Pipeline {
    config: Config,
    plan: ConcurrencyPlan,
    client: reqwest::Client,
    speed_progress: SharedProgress,
    resolution_progress: SharedProgress,
}

impl Pipeline {
    /// Build a pipeline from configuration.
    pub fn new(config: Config) -> Result<Self, PipelineError> {
        let plan = derive_plan(&config);
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            config,
            plan,
            client,
            speed_progress: new_shared_progress(0),
            resolution_progress: new_shared_progress(0),
        })
    }

    /// Build a pipeline from configuration after running startup checks.
    ///
    /// Verifies the stream inspector is available before any probing starts.
    pub fn with_checks(config: Config) -> Result<Self, PipelineError> {
        run_startup_checks(&config)?;
        Self::new(config)
    }

    /// Load configuration from file, apply environment overrides, run
    /// startup checks, and build the pipeline.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let config = Config::load(path)?;
        Self::with_checks(config)
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the derived concurrency plan.
    pub fn concurrency_plan(&self) -> &ConcurrencyPlan {
        &self.plan
    }

    /// Shared progress state of the speed stage.
    pub fn speed_progress(&self) -> SharedProgress {
        self.speed_progress.clone()
    }

    /// Shared progress state of the resolution stage.
    pub fn resolution_progress(&self) -> SharedProgress {
        self.resolution_progress.clone()
    }

    /// Run the speed stage over all channels.
    ///
    /// Returns the accepted survivors in speed-rank order, each carrying its
    /// normalized throughput.
    pub async fn run_speed_stage(&self, channels: Vec<Channel>) -> Vec<RankedChannel> {
        reset_progress(&self.speed_progress, channels.len()).await;

        let executor = ProbeExecutor::new(self.plan.workers, self.speed_progress.clone());
        let probe_cfg = SpeedProbeConfig::from(&self.config.probe);
        let client = self.client.clone();

        let probe = move |channel: Channel| {
            let client = client.clone();
            let probe_cfg = probe_cfg.clone();
            async move { probe_speed(&client, channel, &probe_cfg).await }
        };

        let outcomes = executor.run(channels, probe).await;

        let mut ranked: Vec<RankedChannel> = outcomes
            .into_iter()
            .filter(|outcome| outcome.is_accepted())
            .map(|outcome| RankedChannel::new(outcome.channel, outcome.metric))
            .collect();
        crate::merge::speed_rank(&mut ranked);
        ranked
    }

    /// Run the resolution stage over the speed survivors.
    ///
    /// Returns the subset meeting the minimum resolution, in the same order
    /// and still carrying the speed metric from the first stage.
    pub async fn run_resolution_stage(&self, ranked: Vec<RankedChannel>) -> Vec<RankedChannel> {
        reset_progress(&self.resolution_progress, ranked.len()).await;

        let executor = ProbeExecutor::new(self.plan.workers, self.resolution_progress.clone());
        let probe_cfg = ResolutionProbeConfig::from_config(&self.config.probe, &self.config.filter);

        let probe = move |channel: Channel| {
            let probe_cfg = probe_cfg.clone();
            async move { probe_resolution(channel, &probe_cfg).await }
        };

        let channels: Vec<Channel> = ranked.iter().map(|r| r.channel.clone()).collect();
        let outcomes = executor.run(channels, probe).await;

        // Outcomes come back in submission order, so they pair off with the
        // ranked inputs positionally
        ranked
            .into_iter()
            .zip(outcomes)
            .filter(|(_, outcome)| outcome.is_accepted())
            .map(|(ranked, _)| ranked)
            .collect()
    }

    /// Run the full pipeline: speed stage, barrier, resolution stage,
    /// classify/merge/cap.
    pub async fn run(&self, channels: Vec<Channel>) -> PipelineReport {
        let total = channels.len();

        let ranked = self.run_speed_stage(channels).await;
        let speed_accepted = ranked.len();
        tracing::info!(total, accepted = speed_accepted, "speed stage complete");

        let survivors = self.run_resolution_stage(ranked.clone()).await;
        let resolution_accepted = survivors.len();
        tracing::info!(
            candidates = speed_accepted,
            accepted = resolution_accepted,
            "resolution stage complete"
        );

        let merged = merge(survivors.clone(), &MergeOptions::from(&self.config.sort));
        let curated = apply_caps(&merged, &CategoryCaps::from(&self.config.caps));

        PipelineReport {
            total,
            speed_accepted,
            resolution_accepted,
            ranked,
            survivors,
            merged,
            curated,
        }
    }
}

/// Reset a stage's progress counters for a new item count.
async fn reset_progress(progress: &SharedProgress, total: usize) {
    let mut snapshot = progress.write().await;
    *snapshot = ProgressSnapshot::new(total);
}
