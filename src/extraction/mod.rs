//! Luma extraction.
//!
//! Converts packed-pixel frames into single-channel intensity frames using
//! the perceptual weights 0.2125 R + 0.7154 G + 0.0721 B. Channel positions
//! come from the frame's layout, never from a fixed order.

mod intensity;

pub use intensity::IntensityFrame;

use crate::capture::PixelFrame;

/// Fixed-point weights, scaled by 10 000. They sum to exactly 10 000.
const WEIGHT_RED: u32 = 2125;
const WEIGHT_GREEN: u32 = 7154;
const WEIGHT_BLUE: u32 = 721;
const WEIGHT_SCALE: u32 = 10_000;

/// Computes the luma of one pixel, truncated to a byte.
///
/// Integer arithmetic gives the exact truncation of the real-valued
/// weighted sum, so `luma(v, v, v) == v` for every `v`.
#[inline]
pub fn luma(red: u8, green: u8, blue: u8) -> u8 {
    let sum = WEIGHT_RED * red as u32 + WEIGHT_GREEN * green as u32 + WEIGHT_BLUE * blue as u32;
    (sum / WEIGHT_SCALE) as u8
}

/// Extracts the intensity frame of a packed-pixel frame.
///
/// Pure; safe to call from any thread.
pub fn to_intensity(frame: &PixelFrame) -> IntensityFrame {
    let bpp = frame.bytes_per_pixel();
    let idx = frame.layout().channel_indexes();

    let samples: Vec<u8> = frame
        .pixels()
        .chunks_exact(bpp)
        .map(|px| luma(px[idx.red], px[idx.green], px[idx.blue]))
        .collect();

    IntensityFrame::from_parts(samples, frame.width(), frame.height())
}
