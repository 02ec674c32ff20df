//! # Motion Detection
//!
//! A pixel-format-agnostic motion detection engine. Frames arrive one at a
//! time from a capture source; each is reduced to luma, compared against a
//! reference, and the pixels that changed are painted over in place.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  PixelFrame  │───▶│  Extraction  │───▶│  Detection   │───▶│   Overlay    │
//! │  (+ layout)  │    │  (luma)      │    │  (strategy)  │    │  (in place)  │
//! └──────────────┘    └──────────────┘    └──────┬───────┘    └──────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌──────────────┐    ┌──────────────┐
//!                                         │ MotionMonitor│───▶│   Analysis   │
//!                                         │ (any thread) │    │ alarm, fps   │
//!                                         └──────────────┘    └──────────────┘
//! ```
//!
//! ## Strategies
//!
//! - **two_frame**: each frame against the previous one.
//! - **blob**: change flags accumulated over an eight-frame window and
//!   reported as their union.
//!
//! A frame whose size differs from the reference is skipped without
//! touching the detector; the next frame of the original size continues
//! as if nothing happened. Call [`MotionDetector::reset`] to adopt a new
//! resolution.
//!
//! ## Example
//!
//! ```no_run
//! use motion_detection::{
//!     capture::{Camera, CaptureConfig, MockCamera},
//!     detection::{DetectorConfig, FrameOutcome, MotionDetector, StrategyKind},
//!     analysis::MotionAlarm,
//! };
//!
//! let mut camera = MockCamera::new();
//! camera.open(&CaptureConfig::default()).unwrap();
//!
//! let config = DetectorConfig::with_strategy(StrategyKind::Blob);
//! let mut detector = MotionDetector::new(config).unwrap();
//! let mut alarm = MotionAlarm::default();
//!
//! for _ in 0..32 {
//!     let mut frame = camera.capture().unwrap();
//!     if let FrameOutcome::Detected(report) = detector.process_frame(&mut frame) {
//!         alarm.observe(&report.statistics);
//!     }
//! }
//!
//! println!("motion level: {:.3}", detector.motion_level());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod capture;
pub mod detection;
pub mod extraction;
pub mod metrics;
pub mod overlay;

// Re-export commonly used types at crate root
pub use analysis::{AlarmConfig, FrameRateTracker, MotionAlarm};
pub use capture::{Camera, CaptureConfig, ChannelLayout, FileConfig, MockCamera, PixelFrame};
pub use detection::{
    DetectorConfig, FrameOutcome, MotionDetector, MotionMonitor, MotionStatistics, StrategyKind,
};
pub use extraction::{to_intensity, IntensityFrame};
pub use overlay::{HighlightColor, OverlayRenderer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
