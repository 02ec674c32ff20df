//! Frame source abstraction.
//!
//! Real device enumeration and decoding happen outside this crate. The
//! [`Camera`] trait is the boundary they plug into, and [`MockCamera`]
//! produces synthetic scenes for the demo binary and tests.

use super::{CaptureConfig, ChannelLayout, FrameError, PixelFrame};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// The configuration was rejected.
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    /// The captured bytes did not form a valid frame.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(#[from] FrameError),
    /// `capture` was called before `open`.
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for frame sources.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<PixelFrame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

/// Luma of the static backdrop at its darkest.
const BACKDROP_BASE: u8 = 40;
/// Colour of the moving square.
const SQUARE_COLOR: [u8; 3] = [230, 210, 60];

/// Mock camera rendering a bright square sliding over a static gradient.
///
/// Each capture moves the square by `step` pixels to the right, wrapping
/// at the frame edge and stepping down one square height per wrap.
#[derive(Debug)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
    square: u32,
    step: u32,
}

impl Default for MockCamera {
    fn default() -> Self {
        Self {
            config: None,
            sequence: 0,
            square: 32,
            step: 8,
        }
    }
}

impl MockCamera {
    /// Creates a closed mock camera with a 32-pixel square moving 8 pixels per frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock camera with a custom square size and speed.
    pub fn with_motion(square: u32, step: u32) -> Self {
        Self {
            square: square.max(1),
            step,
            ..Self::default()
        }
    }

    fn current_dimensions(&self, config: &CaptureConfig) -> (u32, u32) {
        match config.resize_after {
            Some(after) if self.sequence >= after => {
                ((config.width / 2).max(1), (config.height / 2).max(1))
            }
            _ => (config.width, config.height),
        }
    }

    fn render(&self, width: u32, height: u32, layout: ChannelLayout) -> Vec<u8> {
        let bpp = layout.bytes_per_pixel();
        let indexes = layout.channel_indexes();
        let square = self.square.min(width).min(height);

        let travel = self.sequence.saturating_mul(self.step as u64);
        let cols = (width - square + 1) as u64;
        let rows = ((height / square).max(1)) as u64;
        let sx = (travel % cols) as u32;
        let sy = (((travel / cols) % rows) as u32) * square;

        let mut pixels = vec![0u8; (width as usize) * (height as usize) * bpp];
        for (i, px) in pixels.chunks_exact_mut(bpp).enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            let inside = x >= sx && x < sx + square && y >= sy && y < sy + square;

            if layout.is_gray() {
                px[0] = if inside {
                    crate::extraction::luma(SQUARE_COLOR[0], SQUARE_COLOR[1], SQUARE_COLOR[2])
                } else {
                    gradient(x, width)
                };
                continue;
            }

            let [r, g, b] = if inside {
                SQUARE_COLOR
            } else {
                let v = gradient(x, width);
                [v, v, v]
            };
            px[indexes.red] = r;
            px[indexes.green] = g;
            px[indexes.blue] = b;
            px[indexes.alpha] = 0xFF;
        }
        pixels
    }
}

fn gradient(x: u32, width: u32) -> u8 {
    BACKDROP_BASE + ((x as u64 * 60) / width.max(1) as u64) as u8
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!(
            width = config.width,
            height = config.height,
            layout = %config.layout,
            "MockCamera opened"
        );
        Ok(())
    }

    fn capture(&mut self) -> Result<PixelFrame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;
        let (width, height) = self.current_dimensions(config);
        let pixels = self.render(width, height, config.layout);
        let layout = config.layout;

        self.sequence += 1;
        Ok(PixelFrame::new(pixels, width, height, layout, self.sequence)?)
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}
