//! Core configuration structures and loading logic

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file
    Io(std::io::Error),
    /// TOML parsing error
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Probe-related configuration for both probing stages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// Concurrent probe workers (0 = auto-derive from CPU count)
    #[serde(default = "default_workers")]
    pub workers: u32,
    /// Overall timeout for one speed probe, in seconds
    #[serde(default = "default_speed_timeout_secs")]
    pub speed_timeout_secs: u64,
    /// Maximum body bytes read during a speed probe
    #[serde(default = "default_speed_max_bytes")]
    pub speed_max_bytes: u64,
    /// Hard kill timeout for one resolution probe, in seconds
    #[serde(default = "default_resolution_timeout_secs")]
    pub resolution_timeout_secs: u64,
    /// Path to the ffprobe binary used for stream inspection
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
}

fn default_workers() -> u32 {
    10
}

fn default_speed_timeout_secs() -> u64 {
    10
}

fn default_speed_max_bytes() -> u64 {
    4 * 1024 * 1024
}

fn default_resolution_timeout_secs() -> u64 {
    15
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            speed_timeout_secs: default_speed_timeout_secs(),
            speed_max_bytes: default_speed_max_bytes(),
            resolution_timeout_secs: default_resolution_timeout_secs(),
            ffprobe_path: default_ffprobe_path(),
        }
    }
}

/// Minimum resolution accepted by the resolution stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Minimum video width in pixels
    #[serde(default = "default_min_width")]
    pub min_width: u32,
    /// Minimum video height in pixels
    #[serde(default = "default_min_height")]
    pub min_height: u32,
}

fn default_min_width() -> u32 {
    1920
}

fn default_min_height() -> u32 {
    1080
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            min_height: default_min_height(),
        }
    }
}

/// Per-category caps on channels sharing one name prefix
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapsConfig {
    /// Cap for the central (CCTV) category
    #[serde(default = "default_cap_central")]
    pub central: usize,
    /// Cap for the satellite category
    #[serde(default = "default_cap_satellite")]
    pub satellite: usize,
    /// Cap for the other category
    #[serde(default = "default_cap_other")]
    pub other: usize,
}

fn default_cap_central() -> usize {
    7
}

fn default_cap_satellite() -> usize {
    7
}

fn default_cap_other() -> usize {
    4
}

impl Default for CapsConfig {
    fn default() -> Self {
        Self {
            central: default_cap_central(),
            satellite: default_cap_satellite(),
            other: default_cap_other(),
        }
    }
}

/// Ordering configuration for the central category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SortConfig {
    /// Flagship channel name sorted first among same-number ties
    #[serde(default = "default_primary_name")]
    pub primary_name: String,
}

fn default_primary_name() -> String {
    "CCTV5".to_string()
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            primary_name: default_primary_name(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub caps: CapsConfig,
    #[serde(default)]
    pub sort: SortConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Parses the config.toml file and handles missing optional fields with defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    ///
    /// Overrides the following values if environment variables are set:
    /// - ITV_PROBE_WORKERS -> probe.workers
    /// - ITV_SPEED_TIMEOUT_SECS -> probe.speed_timeout_secs
    /// - ITV_SPEED_MAX_BYTES -> probe.speed_max_bytes
    /// - ITV_RESOLUTION_TIMEOUT_SECS -> probe.resolution_timeout_secs
    /// - ITV_FFPROBE_PATH -> probe.ffprobe_path
    /// - ITV_MIN_WIDTH / ITV_MIN_HEIGHT -> filter.min_width / filter.min_height
    /// - ITV_CAP_CENTRAL / ITV_CAP_SATELLITE / ITV_CAP_OTHER -> caps.*
    /// - ITV_PRIMARY_NAME -> sort.primary_name
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("ITV_PROBE_WORKERS") {
            if let Ok(workers) = val.parse::<u32>() {
                self.probe.workers = workers;
            }
        }

        if let Ok(val) = env::var("ITV_SPEED_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse::<u64>() {
                self.probe.speed_timeout_secs = secs;
            }
        }

        if let Ok(val) = env::var("ITV_SPEED_MAX_BYTES") {
            if let Ok(bytes) = val.parse::<u64>() {
                self.probe.speed_max_bytes = bytes;
            }
        }

        if let Ok(val) = env::var("ITV_RESOLUTION_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse::<u64>() {
                self.probe.resolution_timeout_secs = secs;
            }
        }

        if let Ok(val) = env::var("ITV_FFPROBE_PATH") {
            if !val.is_empty() {
                self.probe.ffprobe_path = val;
            }
        }

        if let Ok(val) = env::var("ITV_MIN_WIDTH") {
            if let Ok(width) = val.parse::<u32>() {
                self.filter.min_width = width;
            }
        }

        if let Ok(val) = env::var("ITV_MIN_HEIGHT") {
            if let Ok(height) = val.parse::<u32>() {
                self.filter.min_height = height;
            }
        }

        if let Ok(val) = env::var("ITV_CAP_CENTRAL") {
            if let Ok(cap) = val.parse::<usize>() {
                self.caps.central = cap;
            }
        }

        if let Ok(val) = env::var("ITV_CAP_SATELLITE") {
            if let Ok(cap) = val.parse::<usize>() {
                self.caps.satellite = cap;
            }
        }

        if let Ok(val) = env::var("ITV_CAP_OTHER") {
            if let Ok(cap) = val.parse::<usize>() {
                self.caps.other = cap;
            }
        }

        if let Ok(val) = env::var("ITV_PRIMARY_NAME") {
            if !val.is_empty() {
                self.sort.primary_name = val;
            }
        }
    }

    /// Load configuration from file and apply environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }
}
