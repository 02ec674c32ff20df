//! Per-pixel difference threshold.

use crate::capture::ConfigError;

/// Symmetric difference threshold in `[1, 255]`.
///
/// A pixel is changed iff `|reference - current| > T`. A difference of
/// exactly `T` is not a change, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DifferenceThreshold(u8);

impl DifferenceThreshold {
    /// Default threshold.
    pub const DEFAULT: DifferenceThreshold = DifferenceThreshold(30);

    /// Creates a threshold, rejecting 0.
    pub fn new(value: u8) -> Result<Self, ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidThreshold(0));
        }
        Ok(Self(value))
    }

    /// Raw threshold value.
    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Classifies one pixel.
    #[inline]
    pub fn is_changed(self, reference: u8, current: u8) -> bool {
        let diff = reference as i16 - current as i16;
        diff > self.0 as i16 || diff < -(self.0 as i16)
    }
}

impl Default for DifferenceThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}
