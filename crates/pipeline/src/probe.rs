//! Probe outcome types shared by both probing stages.

use crate::channel::Channel;
use serde::{Deserialize, Serialize};

/// Why a probe rejected a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Connection refused, DNS failure, non-200 status, or process error.
    Unreachable,
    /// The probe exceeded its allotted time (network or subprocess).
    Timeout,
    /// Decoder output was not parseable or missing required fields.
    MalformedMetadata,
    /// Parsed successfully but the measured value missed the acceptance bar.
    BelowThreshold,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Unreachable => write!(f, "unreachable"),
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::MalformedMetadata => write!(f, "malformed_metadata"),
            ErrorKind::BelowThreshold => write!(f, "below_threshold"),
        }
    }
}

/// The accept/reject result of one probe against one channel.
///
/// Exactly one outcome exists per channel per stage. An accepted outcome
/// carries a metric (normalized MB/s for the speed stage, megapixels for the
/// resolution stage); a rejected outcome carries the rejection reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub channel: Channel,
    /// Stage metric for accepted outcomes.
    pub metric: Option<f64>,
    /// Rejection reason; None means accepted.
    pub error: Option<ErrorKind>,
}

impl ProbeOutcome {
    /// An accepted outcome with its stage metric.
    pub fn accepted(channel: Channel, metric: f64) -> Self {
        Self {
            channel,
            metric: Some(metric),
            error: None,
        }
    }

    /// A rejected outcome with its reason and no metric.
    pub fn rejected(channel: Channel, error: ErrorKind) -> Self {
        Self {
            channel,
            metric: None,
            error: Some(error),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_outcome_has_metric_and_no_error() {
        let outcome = ProbeOutcome::accepted(Channel::new("CCTV1", "http://a"), 1.5);
        assert!(outcome.is_accepted());
        assert_eq!(outcome.metric, Some(1.5));
        assert_eq!(outcome.error, None);
    }

    #[test]
    fn test_rejected_outcome_has_error_and_no_metric() {
        let outcome = ProbeOutcome::rejected(Channel::new("CCTV1", "http://a"), ErrorKind::Timeout);
        assert!(!outcome.is_accepted());
        assert_eq!(outcome.metric, None);
        assert_eq!(outcome.error, Some(ErrorKind::Timeout));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(format!("{}", ErrorKind::Unreachable), "unreachable");
        assert_eq!(format!("{}", ErrorKind::Timeout), "timeout");
        assert_eq!(format!("{}", ErrorKind::MalformedMetadata), "malformed_metadata");
        assert_eq!(format!("{}", ErrorKind::BelowThreshold), "below_threshold");
    }
}
