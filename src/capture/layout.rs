//! Channel layouts of packed-pixel frames.
//!
//! Decoders hand over frames in whatever byte order the device or codec
//! produced. Everything that reads or writes colour channels goes through
//! [`ChannelLayout::channel_indexes`] instead of assuming an order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte ordering of the channels within one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelLayout {
    /// Red, green, blue, alpha. One byte each.
    Rgba8888,
    /// Blue, green, red, alpha. One byte each.
    Bgra8888,
    /// Alpha first, then red, green, blue.
    Argb8888,
    /// 10-bit colour packed into 4 bytes, addressed with the RGBA offsets.
    Rgba1010102,
    /// Red, green, blue and one padding byte.
    Rgb888x,
    /// Single-channel gray, one byte per pixel.
    Gray8,
    /// A layout tag the engine does not know. Treated as [`ChannelLayout::Rgba8888`].
    Other(u32),
}

impl Default for ChannelLayout {
    fn default() -> Self {
        ChannelLayout::Rgba8888
    }
}

/// Byte offsets of each logical channel within one pixel.
///
/// For 4-byte layouts the offsets are a permutation of `{0, 1, 2, 3}`.
/// For single-channel gray every offset is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelIndexes {
    /// Offset of the red channel.
    pub red: usize,
    /// Offset of the green channel.
    pub green: usize,
    /// Offset of the blue channel.
    pub blue: usize,
    /// Offset of the alpha (or padding) channel.
    pub alpha: usize,
}

impl ChannelIndexes {
    const RGBA: Self = Self::new(0, 1, 2, 3);
    const BGRA: Self = Self::new(2, 1, 0, 3);
    const ARGB: Self = Self::new(1, 2, 3, 0);
    const GRAY: Self = Self::new(0, 0, 0, 0);

    const fn new(red: usize, green: usize, blue: usize, alpha: usize) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Returns the offsets ordered as `[red, green, blue, alpha]`.
    #[inline]
    pub fn as_array(&self) -> [usize; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

impl ChannelLayout {
    /// Every layout the engine recognizes.
    pub const KNOWN: [ChannelLayout; 6] = [
        ChannelLayout::Rgba8888,
        ChannelLayout::Bgra8888,
        ChannelLayout::Argb8888,
        ChannelLayout::Rgba1010102,
        ChannelLayout::Rgb888x,
        ChannelLayout::Gray8,
    ];

    /// Resolves the channel offsets for this layout.
    ///
    /// Unrecognized layouts fall back to red-first ordering. Highlight
    /// colours may come out wrong on such frames.
    pub fn channel_indexes(self) -> ChannelIndexes {
        match self {
            ChannelLayout::Rgba8888 | ChannelLayout::Rgba1010102 | ChannelLayout::Rgb888x => {
                ChannelIndexes::RGBA
            }
            ChannelLayout::Bgra8888 => ChannelIndexes::BGRA,
            ChannelLayout::Argb8888 => ChannelIndexes::ARGB,
            ChannelLayout::Gray8 => ChannelIndexes::GRAY,
            ChannelLayout::Other(_) => ChannelIndexes::RGBA,
        }
    }

    /// Number of bytes occupied by one pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ChannelLayout::Gray8 => 1,
            _ => 4,
        }
    }

    /// Returns false for layouts resolved through the red-first fallback.
    #[inline]
    pub fn is_recognized(self) -> bool {
        !matches!(self, ChannelLayout::Other(_))
    }

    /// Returns true for single-channel layouts.
    #[inline]
    pub fn is_gray(self) -> bool {
        matches!(self, ChannelLayout::Gray8)
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelLayout::Rgba8888 => f.write_str("rgba8888"),
            ChannelLayout::Bgra8888 => f.write_str("bgra8888"),
            ChannelLayout::Argb8888 => f.write_str("argb8888"),
            ChannelLayout::Rgba1010102 => f.write_str("rgba1010102"),
            ChannelLayout::Rgb888x => f.write_str("rgb888x"),
            ChannelLayout::Gray8 => f.write_str("gray8"),
            ChannelLayout::Other(tag) => write!(f, "other({})", tag),
        }
    }
}

/// Error returned when parsing a layout name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown channel layout: {0}")]
pub struct LayoutParseError(String);

impl std::str::FromStr for ChannelLayout {
    type Err = LayoutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        ChannelLayout::KNOWN
            .iter()
            .copied()
            .find(|layout| layout.to_string() == name)
            .ok_or(LayoutParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_permutation(indexes: ChannelIndexes) -> bool {
        let mut offsets = indexes.as_array();
        offsets.sort_unstable();
        offsets == [0, 1, 2, 3]
    }

    #[test]
    fn test_known_layouts_are_permutations_or_gray() {
        for layout in ChannelLayout::KNOWN {
            let indexes = layout.channel_indexes();
            if layout.is_gray() {
                assert_eq!(indexes.as_array(), [0, 0, 0, 0]);
                assert_eq!(layout.bytes_per_pixel(), 1);
            } else {
                assert!(is_permutation(indexes), "{} is not a permutation", layout);
                assert_eq!(layout.bytes_per_pixel(), 4);
            }
        }
    }

    #[test]
    fn test_blue_first_and_alpha_first() {
        let bgra = ChannelLayout::Bgra8888.channel_indexes();
        assert_eq!((bgra.blue, bgra.green, bgra.red, bgra.alpha), (0, 1, 2, 3));

        let argb = ChannelLayout::Argb8888.channel_indexes();
        assert_eq!((argb.alpha, argb.red, argb.green, argb.blue), (0, 1, 2, 3));
    }

    #[test]
    fn test_unknown_layout_falls_back_to_rgba() {
        let layout = ChannelLayout::Other(0xDEAD);
        assert!(!layout.is_recognized());
        assert_eq!(
            layout.channel_indexes(),
            ChannelLayout::Rgba8888.channel_indexes()
        );
        assert_eq!(layout.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_parse_layout_names() {
        assert_eq!("BGRA8888".parse::<ChannelLayout>().unwrap(), ChannelLayout::Bgra8888);
        assert_eq!("gray8".parse::<ChannelLayout>().unwrap(), ChannelLayout::Gray8);
        assert!("yuv420".parse::<ChannelLayout>().is_err());
    }

    proptest! {
        #[test]
        fn prop_write_then_read_roundtrip(
            layout_idx in 0usize..5,
            color in any::<[u8; 4]>(),
        ) {
            // Gray is excluded: its offsets alias on purpose.
            let layout = ChannelLayout::KNOWN[layout_idx];
            let indexes = layout.channel_indexes();
            let mut pixel = [0u8; 4];
            for (offset, value) in indexes.as_array().into_iter().zip(color) {
                pixel[offset] = value;
            }
            let read: Vec<u8> = indexes.as_array().iter().map(|&o| pixel[o]).collect();
            prop_assert_eq!(read, color.to_vec());
        }

        #[test]
        fn prop_other_tags_always_resolve(tag in any::<u32>()) {
            let indexes = ChannelLayout::Other(tag).channel_indexes();
            prop_assert!(is_permutation(indexes));
        }
    }
}
