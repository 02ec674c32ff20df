//! Detector configuration.

use super::strategy::StrategyKind;
use super::threshold::DifferenceThreshold;
use crate::capture::ConfigError;
use crate::overlay::HighlightColor;
use serde::{Deserialize, Serialize};

/// What to do when a frame arrives with a layout tag the engine does not know.
///
/// Either way the frame is processed with red-first channel offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLayoutPolicy {
    /// Use the fallback offsets without comment.
    Fallback,
    /// Use the fallback offsets and log a warning once per unknown tag.
    #[default]
    Warn,
}

/// Configuration of a [`MotionDetector`](super::MotionDetector).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Detection strategy.
    pub strategy: StrategyKind,
    /// Per-pixel difference threshold, 1-255.
    pub threshold: u8,
    /// Colour painted over changed pixels.
    pub highlight: HighlightColor,
    /// Paint changed pixels into the frame.
    pub render_overlay: bool,
    /// Group changed pixels into bounding boxes.
    pub extract_regions: bool,
    /// Smallest region, in pixels, that is reported.
    pub min_region_area: usize,
    /// Handling of unrecognized channel layouts.
    pub unknown_layout: UnknownLayoutPolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            threshold: DifferenceThreshold::DEFAULT.value(),
            highlight: HighlightColor::default(),
            render_overlay: true,
            extract_regions: false,
            min_region_area: 16,
            unknown_layout: UnknownLayoutPolicy::default(),
        }
    }
}

impl DetectorConfig {
    /// Creates a default configuration for the given strategy.
    pub fn with_strategy(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.difference_threshold().map(|_| ())
    }

    /// Returns the threshold as a validated value.
    pub fn difference_threshold(&self) -> Result<DifferenceThreshold, ConfigError> {
        DifferenceThreshold::new(self.threshold)
    }
}
