//! Temporal accumulation ("blob") strategy.
//!
//! Frames are collected into a fill-then-flush window of [`CYCLE_LENGTH`]
//! frames. When the window is full, every buffered frame is binarized
//! against the reference and the binary frames are summed. A pixel is
//! reported as motion when it changed in at least one frame of the window.
//!
//! The union favours sensitivity: brief motion inside the window is never
//! lost, at the price of more false positives than a majority vote.
//!
//! Gap filling and morphological opening are not applied to the result.

use super::mask::ChangeMask;
use super::strategy::{Detection, DetectionStrategy, Phase, StrategyKind};
use super::threshold::DifferenceThreshold;
use crate::extraction::IntensityFrame;

/// Number of frames per accumulation window.
pub const CYCLE_LENGTH: usize = 8;

const CHANGED: u8 = 255;
const UNCHANGED: u8 = 0;

/// Windowed union-of-changes detector.
#[derive(Debug)]
pub struct TemporalAccumulation {
    /// Frames of the window being filled. Cleared after each flush.
    cycle: Vec<IntensityFrame>,
}

impl Default for TemporalAccumulation {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalAccumulation {
    /// Creates a strategy with an empty window.
    pub fn new() -> Self {
        Self {
            cycle: Vec::with_capacity(CYCLE_LENGTH),
        }
    }

    /// Number of frames currently buffered.
    pub fn buffered(&self) -> usize {
        self.cycle.len()
    }

    /// Binarizes the window, sums it and clears the buffer.
    fn flush(&mut self, reference: &IntensityFrame, threshold: DifferenceThreshold) -> Detection {
        let (width, height) = reference.dimensions();

        // The newest frame becomes the next reference; keep it before
        // the buffered copies are overwritten with 0/255.
        let next_reference = match self.cycle.last() {
            Some(frame) => frame.clone(),
            None => reference.clone(),
        };

        // 8 x 255 does not fit in a byte.
        let mut accumulator = vec![0u16; reference.len()];

        for frame in self.cycle.iter_mut() {
            binarize(frame, reference, threshold);
            for (sum, &flag) in accumulator.iter_mut().zip(frame.samples()) {
                *sum += flag as u16;
            }
        }

        let flags = accumulator.iter().map(|&sum| sum > 0).collect();
        let mask = ChangeMask::from_flags(flags, width, height);

        tracing::debug!(
            frames = self.cycle.len(),
            changed = mask.changed_count(),
            "accumulation window complete"
        );

        self.cycle.clear();
        Detection::Complete {
            mask,
            next_reference,
        }
    }
}

/// Rewrites `frame` in place: 255 where it differs from `reference`, 0 elsewhere.
fn binarize(frame: &mut IntensityFrame, reference: &IntensityFrame, threshold: DifferenceThreshold) {
    for (sample, &r) in frame.samples_mut().iter_mut().zip(reference.samples()) {
        *sample = if threshold.is_changed(r, *sample) {
            CHANGED
        } else {
            UNCHANGED
        };
    }
}

impl DetectionStrategy for TemporalAccumulation {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Blob
    }

    fn establish(&mut self, reference: &IntensityFrame) {
        self.cycle.push(reference.clone());
    }

    fn detect(
        &mut self,
        reference: &IntensityFrame,
        current: IntensityFrame,
        threshold: DifferenceThreshold,
    ) -> Detection {
        self.cycle.push(current);

        if self.cycle.len() < CYCLE_LENGTH {
            return Detection::Priming {
                buffered: self.cycle.len(),
            };
        }

        self.flush(reference, threshold)
    }

    fn phase(&self) -> Phase {
        if self.cycle.is_empty() {
            Phase::Active
        } else {
            Phase::Priming
        }
    }

    fn reset(&mut self) {
        self.cycle.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_pixel(width: u32, height: u32, base: u8, index: usize, value: u8) -> IntensityFrame {
        let mut samples = vec![base; (width * height) as usize];
        samples[index] = value;
        IntensityFrame::new(samples, width, height).unwrap()
    }

    #[test]
    fn test_fewer_than_cycle_length_reports_nothing() {
        let mut strategy = TemporalAccumulation::new();
        let reference = IntensityFrame::filled(4, 4, 0);
        strategy.establish(&reference);

        for n in 2..CYCLE_LENGTH {
            let frame = IntensityFrame::filled(4, 4, 255);
            match strategy.detect(&reference, frame, DifferenceThreshold::default()) {
                Detection::Priming { buffered } => assert_eq!(buffered, n),
                other => panic!("frame {} unexpectedly produced {:?}", n, other),
            }
            assert_eq!(strategy.phase(), Phase::Priming);
        }
    }

    #[test]
    fn test_single_flag_in_window_is_reported() {
        let mut strategy = TemporalAccumulation::new();
        let reference = IntensityFrame::filled(4, 4, 50);
        strategy.establish(&reference);

        let mut result = None;
        for n in 2..=CYCLE_LENGTH {
            // Only frame 4 moves pixel 6.
            let frame = if n == 4 {
                with_pixel(4, 4, 50, 6, 200)
            } else {
                IntensityFrame::filled(4, 4, 50)
            };
            result = Some(strategy.detect(&reference, frame, DifferenceThreshold::default()));
        }

        match result {
            Some(Detection::Complete { mask, next_reference }) => {
                assert_eq!(mask.changed_count(), 1);
                assert!(mask.is_changed(6));
                // The last frame keeps its original samples.
                assert_eq!(next_reference, IntensityFrame::filled(4, 4, 50));
            }
            other => panic!("window did not complete: {:?}", other),
        }
        assert_eq!(strategy.buffered(), 0);
        assert_eq!(strategy.phase(), Phase::Active);
    }

    #[test]
    fn test_every_frame_changed_does_not_overflow() {
        let mut strategy = TemporalAccumulation::new();
        let reference = IntensityFrame::filled(2, 2, 0);
        // Reference frame opens the window but does not differ from itself.
        strategy.establish(&reference);

        let mut last = None;
        for _ in 1..CYCLE_LENGTH {
            last = Some(strategy.detect(
                &reference,
                IntensityFrame::filled(2, 2, 255),
                DifferenceThreshold::default(),
            ));
        }

        match last {
            Some(Detection::Complete { mask, .. }) => assert_eq!(mask.changed_count(), 4),
            other => panic!("window did not complete: {:?}", other),
        }
    }

    #[test]
    fn test_next_reference_is_newest_frame() {
        let mut strategy = TemporalAccumulation::new();
        let reference = IntensityFrame::filled(3, 1, 10);
        strategy.establish(&reference);

        let mut last = None;
        for n in 1..CYCLE_LENGTH {
            let frame = IntensityFrame::filled(3, 1, 10 + n as u8 * 10);
            last = Some(strategy.detect(&reference, frame, DifferenceThreshold::default()));
        }

        match last {
            Some(Detection::Complete { next_reference, .. }) => {
                assert_eq!(next_reference.samples(), &[80, 80, 80]);
            }
            other => panic!("window did not complete: {:?}", other),
        }
    }

    #[test]
    fn test_reset_clears_window() {
        let mut strategy = TemporalAccumulation::new();
        let reference = IntensityFrame::filled(2, 2, 0);
        strategy.establish(&reference);
        strategy.detect(&reference, IntensityFrame::filled(2, 2, 0), DifferenceThreshold::default());
        assert_eq!(strategy.buffered(), 2);

        strategy.reset();
        assert_eq!(strategy.buffered(), 0);
    }
}
