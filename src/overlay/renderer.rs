//! In-place highlight rendering.

use super::color::HighlightColor;
use crate::capture::PixelFrame;
use crate::detection::ChangeMask;

/// Paints changed pixels of a frame with a highlight colour.
///
/// Unchanged pixels are left byte-for-byte intact. Channel positions come
/// from the frame's layout, so the colour lands correctly in RGBA, BGRA,
/// ARGB and padded frames alike. On single-channel frames the colour's
/// luma is written instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayRenderer {
    color: HighlightColor,
}

impl OverlayRenderer {
    /// Creates a renderer painting with `color`.
    pub fn new(color: HighlightColor) -> Self {
        Self { color }
    }

    /// Highlight colour.
    #[inline]
    pub fn color(&self) -> HighlightColor {
        self.color
    }

    /// Rewrites `frame` in place and returns the number of pixels painted.
    ///
    /// # Panics
    ///
    /// If the mask does not have the frame's dimensions.
    pub fn render(&self, frame: &mut PixelFrame, mask: &ChangeMask) -> usize {
        assert_eq!(
            mask.dimensions(),
            frame.dimensions(),
            "change mask does not match frame dimensions"
        );
        let bpp = frame.bytes_per_pixel();
        assert_eq!(frame.pixels().len(), mask.len() * bpp);

        let layout = frame.layout();
        let idx = layout.channel_indexes();
        let gray = self.color.luma();
        let mut painted = 0;

        for (px, changed) in frame.pixels_mut().chunks_exact_mut(bpp).zip(mask.iter()) {
            if !changed {
                continue;
            }
            if layout.is_gray() {
                px[0] = gray;
            } else {
                px[idx.red] = self.color.red;
                px[idx.green] = self.color.green;
                px[idx.blue] = self.color.blue;
                px[idx.alpha] = self.color.alpha;
            }
            painted += 1;
        }

        painted
    }
}
