//! Capture and application configuration.
//!
//! The capture section only describes what the synthetic source should
//! produce; device lifecycle belongs to whatever feeds real frames in.

use super::layout::ChannelLayout;
use crate::analysis::AlarmConfig;
use crate::detection::DetectorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the frame source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target frames per second.
    pub fps: u32,
    /// Channel layout of delivered frames.
    pub layout: ChannelLayout,
    /// Switch to half resolution after this many frames (mock source only).
    pub resize_after: Option<u64>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
            layout: ChannelLayout::Bgra8888,
            resize_after: None,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }

    /// Interval between frames at the configured rate.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    /// Frame rate outside 1-120.
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    /// Difference threshold outside 1-255.
    #[error("invalid difference threshold {0} (must be 1-255)")]
    InvalidThreshold(u32),
    /// Alarm level outside 0-1.
    #[error("invalid alarm level {0} (must be within 0.0-1.0)")]
    InvalidAlarmLevel(f64),
    /// Strategy name not in the registry.
    #[error("unknown detection strategy: {0}")]
    UnknownStrategy(String),
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for these sections.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Frame source settings.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Detector settings.
    #[serde(default)]
    pub detector: DetectorConfig,
    /// Alarm settings.
    #[serde(default)]
    pub alarm: AlarmConfig,
    /// Run and reporting settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Run continuously (true) or process fixed number of frames (false).
    pub continuous: bool,
    /// Number of frames to process if not continuous.
    pub frame_count: u32,
    /// How often the status reader logs the published motion level.
    pub report_interval_ms: u64,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 100,
            report_interval_ms: 500,
            metrics_port: 9090,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        self.detector.validate()?;
        self.alarm.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::StrategyKind;

    #[test]
    fn test_default_config_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let mut config = CaptureConfig::default();
        config.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_parse_toml_sections() {
        let config = FileConfig::from_toml(
            r##"
            [capture]
            width = 320
            height = 240
            layout = "rgba8888"

            [detector]
            strategy = "blob"
            threshold = 12
            highlight = "#FF00FF00"

            [alarm]
            level = 0.05
            "##,
        )
        .unwrap();

        assert_eq!(config.capture.width, 320);
        assert_eq!(config.capture.layout, ChannelLayout::Rgba8888);
        assert_eq!(config.detector.strategy, StrategyKind::Blob);
        assert_eq!(config.detector.threshold, 12);
        assert_eq!(config.detector.highlight.green, 0xFF);
        assert!((config.alarm.level - 0.05).abs() < f64::EPSILON);
        // Untouched sections keep their defaults
        assert_eq!(config.output.frame_count, 100);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let result = FileConfig::from_toml("[detector]\nthreshold = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidThreshold(0))));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = FileConfig::from_toml("[capture\nwidth = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_capture_section_has_only_source_fields() {
        let text = toml::to_string(&CaptureConfig::default()).unwrap();
        assert!(text.contains("width = 640"));
        assert!(text.contains("layout = \"bgra8888\""));
        assert!(!text.contains("device"));
    }
}
