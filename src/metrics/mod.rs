//! Prometheus metrics exporter for motion monitoring.
//!
//! # Metrics Exposed
//!
//! ## Throughput
//! - `motion_detection_frames_processed_total` - Frames handed to the detector
//! - `motion_detection_frames_skipped_total` - Frames skipped on a size change
//! - `motion_detection_current_fps` - Recent frame delivery rate
//!
//! ## Motion
//! - `motion_detection_changed_pixels` - Changed pixels in the latest result
//! - `motion_detection_motion_level` - Changed fraction of the latest frame
//!
//! ## Alarm
//! - `motion_detection_alarm_active` - Alarm status (1=active, 0=quiet)
//! - `motion_detection_alarms_raised_total` - Alarm activations
//!
//! With the `metrics` feature, [`MetricsServer`] serves these on `/metrics`
//! next to `/health` and a plaintext `/status`.
//!
//! # Example
//!
//! ```no_run
//! use motion_detection::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     frames_processed: 120,
//!     frames_skipped: 0,
//!     changed_pixels: 4_096,
//!     motion_level: 0.013,
//!     alarm_active: true,
//!     alarms_raised: 1,
//!     current_fps: 29.8,
//! };
//!
//! registry.update(&snapshot);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError};
