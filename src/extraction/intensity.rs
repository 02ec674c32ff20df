//! Single-channel intensity frame.

use crate::capture::FrameError;

/// Row-major luma samples, one byte per pixel.
///
/// This is the output of luma extraction and the unit every detection
/// strategy works on. Its dimensions always match the source frame.
#[derive(Clone, PartialEq, Eq)]
pub struct IntensityFrame {
    samples: Vec<u8>,
    width: u32,
    height: u32,
}

impl IntensityFrame {
    /// Wraps existing samples, checking the length against the dimensions.
    pub fn new(samples: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyFrame { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if samples.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            samples,
            width,
            height,
        })
    }

    /// Creates a frame where every sample has the same value.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            samples: vec![value; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Builds a frame from samples already known to be `width * height` long.
    pub(crate) fn from_parts(samples: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(samples.len(), (width as usize) * (height as usize));
        Self {
            samples,
            width,
            height,
        }
    }

    /// Returns the luma samples.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    #[inline]
    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
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

    /// Number of samples (width * height).
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the sample at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

impl std::fmt::Debug for IntensityFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntensityFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("samples", &self.samples.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(IntensityFrame::new(vec![0; 12], 4, 3).is_ok());
        assert!(matches!(
            IntensityFrame::new(vec![0; 11], 4, 3),
            Err(FrameError::SizeMismatch { expected: 12, actual: 11 })
        ));
    }

    #[test]
    fn test_get_is_row_major() {
        let frame = IntensityFrame::new((0..12).collect(), 4, 3).unwrap();
        assert_eq!(frame.get(0, 0), Some(0));
        assert_eq!(frame.get(3, 0), Some(3));
        assert_eq!(frame.get(1, 2), Some(9));
        assert_eq!(frame.get(4, 2), None);
    }
}
