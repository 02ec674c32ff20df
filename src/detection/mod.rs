//! Change detection.
//!
//! A [`MotionDetector`] owns one [`DetectionStrategy`] and a reference
//! frame. Two strategies are built in:
//!
//! - [`TwoFrameDifference`]: every frame is compared with the previous one.
//! - [`TemporalAccumulation`]: change flags are collected over a window of
//!   [`CYCLE_LENGTH`] frames and reported as their union.
//!
//! Statistics and the reference frame are published through lock-free
//! single-slot cells, readable from other threads via [`MotionMonitor`].

mod background;
mod blob;
mod config;
mod detector;
mod mask;
mod stats;
mod strategy;
mod threshold;
mod two_frame;

pub use background::BackgroundModel;
pub use blob::{TemporalAccumulation, CYCLE_LENGTH};
pub use config::{DetectorConfig, UnknownLayoutPolicy};
pub use detector::{DetectorState, FrameOutcome, MotionDetector, MotionReport, SkipReason};
pub use mask::{ChangeMask, Region};
pub use stats::{MotionMonitor, MotionStatistics};
pub use strategy::{Detection, DetectionStrategy, Phase, StrategyKind};
pub use threshold::DifferenceThreshold;
pub use two_frame::TwoFrameDifference;
