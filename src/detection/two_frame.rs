//! Two-frame difference strategy.

use super::mask::ChangeMask;
use super::strategy::{Detection, DetectionStrategy, StrategyKind};
use super::threshold::DifferenceThreshold;
use crate::extraction::IntensityFrame;

/// Compares each frame directly with the reference, then makes the frame
/// the next reference.
///
/// Holds no state of its own; the only memory is the single reference
/// frame kept by the detector.
#[derive(Debug, Default)]
pub struct TwoFrameDifference;

impl TwoFrameDifference {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

impl DetectionStrategy for TwoFrameDifference {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TwoFrame
    }

    fn detect(
        &mut self,
        reference: &IntensityFrame,
        current: IntensityFrame,
        threshold: DifferenceThreshold,
    ) -> Detection {
        let mask = ChangeMask::difference(reference, &current, threshold);
        tracing::trace!(changed = mask.changed_count(), "two-frame difference");
        Detection::Complete {
            mask,
            next_reference: current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frame of `base` with a `w x h` rectangle at `(x0, y0)` set to `value`.
    fn with_rect(width: u32, height: u32, base: u8, rect: (u32, u32, u32, u32), value: u8) -> IntensityFrame {
        let (x0, y0, w, h) = rect;
        let samples = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| {
                if x >= x0 && x < x0 + w && y >= y0 && y < y0 + h {
                    value
                } else {
                    base
                }
            })
            .collect();
        IntensityFrame::new(samples, width, height).unwrap()
    }

    #[test]
    fn test_rectangle_area_counted_exactly() {
        let mut strategy = TwoFrameDifference::new();
        let reference = IntensityFrame::filled(40, 30, 80);
        let current = with_rect(40, 30, 80, (5, 7, 12, 9), 80 + 31);

        match strategy.detect(&reference, current.clone(), DifferenceThreshold::default()) {
            Detection::Complete { mask, next_reference } => {
                assert_eq!(mask.changed_count(), 12 * 9);
                assert_eq!(next_reference, current);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_darkening_counts_as_change() {
        let mut strategy = TwoFrameDifference::new();
        let reference = IntensityFrame::filled(10, 10, 200);
        let current = with_rect(10, 10, 200, (0, 0, 3, 3), 10);

        match strategy.detect(&reference, current, DifferenceThreshold::default()) {
            Detection::Complete { mask, .. } => assert_eq!(mask.changed_count(), 9),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_delta_equal_to_threshold_is_ignored() {
        let mut strategy = TwoFrameDifference::new();
        let reference = IntensityFrame::filled(4, 4, 100);
        let current = IntensityFrame::filled(4, 4, 130);

        match strategy.detect(&reference, current, DifferenceThreshold::default()) {
            Detection::Complete { mask, .. } => assert_eq!(mask.changed_count(), 0),
            other => panic!("unexpected {:?}", other),
        }
    }
}
