//! Detection strategy capability and the registry of built-in strategies.

use super::blob::TemporalAccumulation;
use super::mask::ChangeMask;
use super::threshold::DifferenceThreshold;
use super::two_frame::TwoFrameDifference;
use crate::capture::ConfigError;
use crate::extraction::IntensityFrame;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a strategy is still collecting frames or producing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Buffering frames; no statistics yet for this window.
    Priming,
    /// Every frame (or the last completed window) produced statistics.
    Active,
}

/// Result of feeding one intensity frame to a strategy.
#[derive(Debug)]
pub enum Detection {
    /// The frame was buffered; nothing to report yet.
    Priming {
        /// Frames currently held by the strategy.
        buffered: usize,
    },
    /// Classification finished.
    Complete {
        /// Pixels classified as motion.
        mask: ChangeMask,
        /// Frame that should become the new reference.
        next_reference: IntensityFrame,
    },
}

/// A change-detection algorithm.
///
/// Implementations only classify pixels. Dimension checks, overlay
/// rendering and publication are done once by
/// [`MotionDetector`](super::MotionDetector) for every strategy.
pub trait DetectionStrategy: Send {
    /// Identifier of this strategy.
    fn kind(&self) -> StrategyKind;

    /// Called with the frame that establishes the first reference.
    fn establish(&mut self, _reference: &IntensityFrame) {}

    /// Classifies `current` against `reference`.
    ///
    /// The caller guarantees both frames have the same dimensions.
    fn detect(
        &mut self,
        reference: &IntensityFrame,
        current: IntensityFrame,
        threshold: DifferenceThreshold,
    ) -> Detection;

    /// Current phase.
    fn phase(&self) -> Phase {
        Phase::Active
    }

    /// Drops any buffered frames.
    fn reset(&mut self) {}
}

/// Built-in strategies, resolved at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Compare each frame with the previous one.
    #[default]
    TwoFrame,
    /// Accumulate change over a fixed window of frames.
    Blob,
}

impl StrategyKind {
    /// Every registered strategy, in presentation order.
    pub const ALL: [StrategyKind; 2] = [StrategyKind::TwoFrame, StrategyKind::Blob];

    /// Constructs a fresh instance of the strategy.
    pub fn build(self) -> Box<dyn DetectionStrategy> {
        match self {
            StrategyKind::TwoFrame => Box::new(TwoFrameDifference::new()),
            StrategyKind::Blob => Box::new(TemporalAccumulation::new()),
        }
    }

    /// Stable identifier used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::TwoFrame => "two_frame",
            StrategyKind::Blob => "blob",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_builds_matching_kind() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.build().kind(), kind);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("two_frame".parse::<StrategyKind>().unwrap(), StrategyKind::TwoFrame);
        assert_eq!("Two-Frame".parse::<StrategyKind>().unwrap(), StrategyKind::TwoFrame);
        assert_eq!("blob".parse::<StrategyKind>().unwrap(), StrategyKind::Blob);
        assert!(matches!(
            "median".parse::<StrategyKind>(),
            Err(ConfigError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }
}
