//! Startup checks.
//!
//! Preflight verification that the external stream inspector is present
//! before the resolution stage spawns it hundreds of times.

use itv_curator_config::Config;
use std::process::Command;
use thiserror::Error;

/// Error types for startup checks
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("ffprobe not available: {0}")]
    FfprobeUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check if the configured inspector is available by running `<ffprobe> -version`
pub fn check_ffprobe_available(ffprobe_path: &str) -> Result<(), StartupError> {
    let output = Command::new(ffprobe_path)
        .arg("-version")
        .output()
        .map_err(|e| {
            StartupError::FfprobeUnavailable(format!(
                "{} -version failed; is ffprobe installed and in PATH? Error: {}",
                ffprobe_path, e
            ))
        })?;

    if !output.status.success() {
        return Err(StartupError::FfprobeUnavailable(format!(
            "{} -version exited with status {}",
            ffprobe_path, output.status
        )));
    }

    Ok(())
}

/// Run all startup checks for a full two-stage run
pub fn run_startup_checks(cfg: &Config) -> Result<(), StartupError> {
    check_ffprobe_available(&cfg.probe.ffprobe_path)
}
