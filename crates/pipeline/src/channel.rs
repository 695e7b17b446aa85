//! Channel types and name helpers.
//!
//! A channel is a named streaming endpoint. Channel names commonly carry a
//! numeric token ("CCTV1", "北京卫视 1080") and a leading prefix token used
//! for grouping; both are extracted here as pure functions of the name.

use serde::{Deserialize, Serialize};

/// A named streaming endpoint read from the source list.
///
/// Channels are immutable once created; the pipeline only produces new
/// records associated with them, it never mutates the channel itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    /// Display name, e.g. "CCTV1 综合" or "北京卫视".
    pub name: String,
    /// Opaque stream locator.
    pub url: String,
}

impl Channel {
    /// Create a channel from trimmed name and url fields.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Leading token of the name, used for grouping and categorization.
    pub fn prefix(&self) -> &str {
        name_prefix(&self.name)
    }

    /// First numeric token in the name, if any.
    pub fn numeric_token(&self) -> Option<u64> {
        numeric_token(&self.name)
    }
}

/// A channel together with its normalized download speed in MB/s.
///
/// Produced by the speed stage; the speed is carried through the resolution
/// stage so the final ordering can still rank same-named duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedChannel {
    pub channel: Channel,
    /// Normalized throughput in MB/s, when the speed probe measured one.
    pub speed: Option<f64>,
}

impl RankedChannel {
    pub fn new(channel: Channel, speed: Option<f64>) -> Self {
        Self { channel, speed }
    }
}

/// Extracts the name prefix: the substring before the first space.
///
/// Names without a space are their own prefix.
pub fn name_prefix(name: &str) -> &str {
    name.split(' ').next().unwrap_or(name)
}

/// Parses the first contiguous run of ASCII digits in the name.
///
/// Returns None for names without digits; callers treat that as a
/// larger-than-any-number sentinel so unnumbered channels sort last.
pub fn numeric_token(name: &str) -> Option<u64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: String = name[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u64>().ok()
}
