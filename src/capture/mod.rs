//! Frame input boundary.
//!
//! This module describes what the engine receives from a capture source:
//! packed-pixel frames tagged with a channel layout. Device handling stays
//! outside; [`MockCamera`] fills in for it in the demo and tests.

mod camera;
mod config;
mod frame;
mod layout;

pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, ConfigError, FileConfig, OutputConfig};
pub use frame::{FrameError, PixelFrame};
pub use layout::{ChannelIndexes, ChannelLayout, LayoutParseError};
