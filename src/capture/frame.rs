//! Packed-pixel frame type handed over by the capture source.

use super::layout::ChannelLayout;
use std::time::Instant;
use thiserror::Error;

/// Errors raised when a pixel buffer does not describe a usable frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Width or height is zero.
    #[error("frame has zero area ({width}x{height})")]
    EmptyFrame {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Buffer length does not match `width * height * bytes_per_pixel`.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    SizeMismatch {
        /// Length implied by the dimensions and layout.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
}

/// A single decoded frame in packed-pixel form.
///
/// The buffer length is checked once at construction, so every later
/// per-pixel walk can rely on `pixels.len() == width * height * bytes_per_pixel`.
#[derive(Clone)]
pub struct PixelFrame {
    /// Packed pixel bytes, row-major.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Channel order within each pixel.
    layout: ChannelLayout,
    /// Capture timestamp.
    timestamp: Instant,
    /// Monotonic sequence number assigned by the source.
    sequence: u64,
}

impl PixelFrame {
    /// Creates a frame, validating the buffer against the dimensions and layout.
    pub fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        layout: ChannelLayout,
        sequence: u64,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyFrame { width, height });
        }
        let expected = frame_len(width, height, layout);
        if pixels.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            layout,
            timestamp: Instant::now(),
            sequence,
        })
    }

    /// Returns the packed pixel bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the packed pixel bytes for in-place modification.
    ///
    /// The length cannot change through a slice, so the construction
    /// invariant survives.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consumes the frame and returns its buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Channel layout tag.
    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Bytes per pixel implied by the layout.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.layout.bytes_per_pixel()
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the bytes of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.bytes_per_pixel();
        let start = (y as usize * self.width as usize + x as usize) * bpp;
        self.pixels.get(start..start + bpp)
    }
}

impl std::fmt::Debug for PixelFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layout", &self.layout)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

/// Expected buffer length for a frame of the given shape.
pub(crate) fn frame_len(width: u32, height: u32, layout: ChannelLayout) -> usize {
    (width as usize) * (height as usize) * layout.bytes_per_pixel()
}
