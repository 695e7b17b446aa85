//! ITV Curator
//!
//! Batch pipeline that probes streaming-channel endpoints for reachability,
//! throughput, and resolution, then curates the survivors into ranked,
//! deduplicated, category-capped playlists.

pub mod channel;
pub mod classify;
pub mod concurrency;
pub mod executor;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod resolution;
pub mod source;
pub mod speed;
pub mod startup;

pub use itv_curator_config as config;
pub use itv_curator_config::Config;

pub use channel::{name_prefix, numeric_token, Channel, RankedChannel};
pub use classify::{classify_name, group_title, Category, FALLBACK_GROUP};
pub use concurrency::{derive_plan, ConcurrencyPlan};
pub use executor::ProbeExecutor;
pub use merge::{apply_caps, merge, speed_rank, CategoryCaps, MergeOptions, MergedList};
pub use output::{
    render_category_m3u, render_category_text, render_m3u, render_ranked, render_survivor_list,
    render_text, M3U_HEADER,
};
pub use pipeline::{Pipeline, PipelineError, PipelineReport};
pub use probe::{ErrorKind, ProbeOutcome};
pub use progress::{new_shared_progress, ProgressSnapshot, SharedProgress};
pub use resolution::{
    meets_threshold, parse_ffprobe_output, probe_resolution, ResolutionProbeConfig,
    VideoResolution,
};
pub use source::{parse_channel_list, read_channel_list, SourceError, GENRE_HEADER_SUFFIX};
pub use speed::{
    normalized_throughput, probe_speed, SpeedProbeConfig, MAX_NORMALIZED_MBPS, MIN_NORMALIZED_MBPS,
};
pub use startup::{check_ffprobe_available, run_startup_checks, StartupError};
