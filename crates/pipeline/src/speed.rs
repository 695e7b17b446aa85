//! Speed prober.
//!
//! Issues a single streaming GET against a channel URL, measures bytes
//! received against elapsed wall time, and classifies the channel as
//! accepted (with a normalized MB/s metric) or rejected. All failures are
//! swallowed into the rejected outcome; nothing propagates to the caller.

use crate::channel::Channel;
use crate::probe::{ErrorKind, ProbeOutcome};
use itv_curator_config::ProbeConfig;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Lower clamp for the normalized metric, in MB/s.
pub const MIN_NORMALIZED_MBPS: f64 = 0.001;
/// Upper clamp for the normalized metric, in MB/s.
pub const MAX_NORMALIZED_MBPS: f64 = 100.0;

/// Settings for one speed probe.
#[derive(Debug, Clone)]
pub struct SpeedProbeConfig {
    /// Overall deadline covering connect, headers, and body read.
    pub timeout: Duration,
    /// Stop reading the body after this many bytes.
    pub max_bytes: u64,
}

impl Default for SpeedProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_bytes: 4 * 1024 * 1024,
        }
    }
}

impl From<&ProbeConfig> for SpeedProbeConfig {
    fn from(cfg: &ProbeConfig) -> Self {
        Self {
            timeout: Duration::from_secs(cfg.speed_timeout_secs),
            max_bytes: cfg.speed_max_bytes,
        }
    }
}

/// Normalizes a measured transfer to MB/s, clamped to a sane range.
///
/// The clamp suppresses outliers from near-instant tiny responses (which
/// would otherwise read as absurdly fast) and from pathological slow reads.
pub fn normalized_throughput(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    let raw = if secs > 0.0 {
        bytes as f64 / secs / (1024.0 * 1024.0)
    } else {
        f64::INFINITY
    };
    raw.clamp(MIN_NORMALIZED_MBPS, MAX_NORMALIZED_MBPS)
}

/// Probes one channel's download speed.
///
/// Accepted iff the URL answers 200 within the deadline; the metric is the
/// normalized throughput over the bytes actually read (capped at
/// `max_bytes`). Non-200 and transport errors reject as unreachable, a blown
/// deadline rejects as timeout.
pub async fn probe_speed(client: &Client, channel: Channel, cfg: &SpeedProbeConfig) -> ProbeOutcome {
    let started = Instant::now();

    match timeout(cfg.timeout, fetch_bytes(client, &channel.url, cfg.max_bytes)).await {
        Ok(Ok(bytes)) => {
            let speed = normalized_throughput(bytes, started.elapsed());
            tracing::debug!(
                channel = %channel.name,
                bytes,
                speed_mbps = speed,
                "speed probe accepted"
            );
            ProbeOutcome::accepted(channel, speed)
        }
        Ok(Err(kind)) => ProbeOutcome::rejected(channel, kind),
        Err(_elapsed) => ProbeOutcome::rejected(channel, ErrorKind::Timeout),
    }
}

/// Streams the response body, counting bytes up to the cap.
async fn fetch_bytes(client: &Client, url: &str, max_bytes: u64) -> Result<u64, ErrorKind> {
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(classify_transport_error)?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(ErrorKind::Unreachable);
    }

    let mut received = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(classify_transport_error)? {
        received += chunk.len() as u64;
        if received >= max_bytes {
            break;
        }
    }

    Ok(received)
}

fn classify_transport_error(err: reqwest::Error) -> ErrorKind {
    if err.is_timeout() {
        ErrorKind::Timeout
    } else {
        ErrorKind::Unreachable
    }
}
