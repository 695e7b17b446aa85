//! Resolution prober.
//!
//! Spawns an external stream inspector (ffprobe) per channel URL to read
//! structural metadata, with a hard wall-clock timeout. The child process is
//! killed and reaped on every exit path, including timeout. Acceptance is a
//! minimum-resolution gate on the first video stream.

use crate::channel::Channel;
use crate::probe::{ErrorKind, ProbeOutcome};
use itv_curator_config::{FilterConfig, ProbeConfig};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

/// Settings for one resolution probe.
#[derive(Debug, Clone)]
pub struct ResolutionProbeConfig {
    /// Path to the ffprobe binary.
    pub ffprobe_path: String,
    /// Hard deadline; the child is killed when it elapses.
    pub timeout: Duration,
    /// Minimum accepted video width in pixels.
    pub min_width: u32,
    /// Minimum accepted video height in pixels.
    pub min_height: u32,
}

impl Default for ResolutionProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            timeout: Duration::from_secs(15),
            min_width: 1920,
            min_height: 1080,
        }
    }
}

impl ResolutionProbeConfig {
    /// Build probe settings from the probe and filter config sections.
    pub fn from_config(probe: &ProbeConfig, filter: &FilterConfig) -> Self {
        Self {
            ffprobe_path: probe.ffprobe_path.clone(),
            timeout: Duration::from_secs(probe.resolution_timeout_secs),
            min_width: filter.min_width,
            min_height: filter.min_height,
        }
    }
}

/// Width and height of the first video stream reported by the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResolution {
    pub width: u32,
    pub height: u32,
}

impl VideoResolution {
    /// Pixel count in megapixels, used as the stage metric.
    pub fn megapixels(&self) -> f64 {
        (self.width as f64 * self.height as f64) / 1_000_000.0
    }
}

/// Raw ffprobe JSON structures for parsing.
mod ffprobe_json {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct FfprobeOutput {
        pub streams: Option<Vec<Stream>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Stream {
        pub width: Option<u32>,
        pub height: Option<u32>,
    }
}

/// Parses ffprobe JSON output into the first video stream's resolution.
///
/// Missing streams or missing width/height fields are malformed metadata,
/// not a threshold failure.
pub fn parse_ffprobe_output(json_str: &str) -> Result<VideoResolution, ErrorKind> {
    let output: ffprobe_json::FfprobeOutput =
        serde_json::from_str(json_str).map_err(|_| ErrorKind::MalformedMetadata)?;

    let stream = output
        .streams
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(ErrorKind::MalformedMetadata)?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) => Ok(VideoResolution { width, height }),
        _ => Err(ErrorKind::MalformedMetadata),
    }
}

/// Whether a resolution meets the minimum acceptance gate.
pub fn meets_threshold(resolution: VideoResolution, min_width: u32, min_height: u32) -> bool {
    resolution.width >= min_width && resolution.height >= min_height
}

/// Build the inspector command for a stream URL.
///
/// Runs `ffprobe -v quiet -print_format json -show_streams -select_streams v <url>`
/// with stdout piped and the child marked kill-on-drop so no probe can leak
/// a running process.
pub fn build_ffprobe_command(cfg: &ResolutionProbeConfig, url: &str) -> Command {
    let mut cmd = Command::new(&cfg.ffprobe_path);
    cmd.arg("-v").arg("quiet");
    cmd.arg("-print_format").arg("json");
    cmd.arg("-show_streams");
    cmd.arg("-select_streams").arg("v");
    cmd.arg(url);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::null());
    cmd.kill_on_drop(true);
    cmd
}

/// Probes one channel's stream resolution.
///
/// Accepted iff the inspector reports a first video stream at or above the
/// configured minimum; the metric is the stream's megapixel count. Timeout
/// kills and reaps the child before rejecting.
pub async fn probe_resolution(channel: Channel, cfg: &ResolutionProbeConfig) -> ProbeOutcome {
    match inspect_stream(&channel.url, cfg).await {
        Ok(resolution) if meets_threshold(resolution, cfg.min_width, cfg.min_height) => {
            tracing::debug!(
                channel = %channel.name,
                width = resolution.width,
                height = resolution.height,
                "resolution probe accepted"
            );
            ProbeOutcome::accepted(channel, resolution.megapixels())
        }
        Ok(_) => ProbeOutcome::rejected(channel, ErrorKind::BelowThreshold),
        Err(kind) => ProbeOutcome::rejected(channel, kind),
    }
}

/// Runs the inspector and parses its output, enforcing the hard deadline.
async fn inspect_stream(
    url: &str,
    cfg: &ResolutionProbeConfig,
) -> Result<VideoResolution, ErrorKind> {
    let mut child = build_ffprobe_command(cfg, url)
        .spawn()
        .map_err(|_| ErrorKind::Unreachable)?;
    let mut stdout = child.stdout.take().ok_or(ErrorKind::Unreachable)?;

    // Read stdout while waiting so the pipe cannot fill and stall the child
    let collect = async {
        let mut buf = Vec::new();
        stdout
            .read_to_end(&mut buf)
            .await
            .map_err(|_| ErrorKind::Unreachable)?;
        let status = child.wait().await.map_err(|_| ErrorKind::Unreachable)?;
        Ok::<_, ErrorKind>((status, buf))
    };

    let result = timeout(cfg.timeout, collect).await;

    match result {
        Ok(Ok((status, buf))) => {
            if !status.success() {
                return Err(ErrorKind::Unreachable);
            }
            parse_ffprobe_output(&String::from_utf8_lossy(&buf))
        }
        Ok(Err(kind)) => Err(kind),
        Err(_elapsed) => {
            // Kill and reap before reporting; never leave a running child
            let _ = child.kill().await;
            Err(ErrorKind::Timeout)
        }
    }
}
