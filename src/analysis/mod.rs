//! Stream-level analysis on top of per-frame statistics.
//!
//! The detector reports how much of each frame moved. This module turns
//! that into alarm events and tracks how fast frames arrive.

mod alarm;
mod rate;

pub use alarm::{AlarmConfig, AlarmEvent, MotionAlarm};
pub use rate::{FrameRate, FrameRateTracker};
