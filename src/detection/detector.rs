//! Motion detector facade.
//!
//! Per frame: extract luma, check dimensions against the reference, run the
//! strategy, paint the overlay, replace the reference, publish statistics.
//!
//! ```text
//!                 first frame           window complete
//! Uninitialized ──────────────▶ Priming ───────────────▶ Active
//!       ▲                          ▲                        │
//!       │ reset()                  └──── next frame ────────┘ (blob)
//! ```
//!
//! The two-frame strategy goes straight from `Uninitialized` to `Active`.

use super::config::{DetectorConfig, UnknownLayoutPolicy};
use super::mask::Region;
use super::stats::{MotionMonitor, MotionStatistics, SharedState};
use super::strategy::{Detection, DetectionStrategy, Phase, StrategyKind};
use super::threshold::DifferenceThreshold;
use crate::capture::{ConfigError, PixelFrame};
use crate::extraction;
use crate::overlay::OverlayRenderer;
use std::collections::HashSet;
use std::sync::Arc;

/// Lifecycle state of a detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// No reference frame yet.
    Uninitialized,
    /// Reference established, window still filling.
    Priming,
    /// Producing statistics.
    Active,
}

/// Why a frame was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Frame size differs from the established reference.
    DimensionMismatch {
        /// Dimensions of the reference frame.
        expected: (u32, u32),
        /// Dimensions of the rejected frame.
        actual: (u32, u32),
    },
}

/// Statistics and regions of a completed detection.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionReport {
    /// Statistics published for this frame.
    pub statistics: MotionStatistics,
    /// Bounding boxes of changed areas. Empty unless region extraction is enabled.
    pub regions: Vec<Region>,
}

/// Result of [`MotionDetector::process_frame`].
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The frame became the first reference. Zero motion.
    ReferenceEstablished,
    /// The frame was buffered. Zero motion.
    Priming {
        /// Frames held by the strategy, including this one.
        buffered: usize,
    },
    /// Motion was measured and the overlay rendered.
    Detected(MotionReport),
    /// The frame was ignored and no state changed. Zero motion.
    Skipped(SkipReason),
}

impl FrameOutcome {
    /// Motion level attributable to this frame.
    pub fn motion_level(&self) -> f64 {
        match self {
            FrameOutcome::Detected(report) => report.statistics.motion_level(),
            _ => 0.0,
        }
    }

    /// Changed pixels attributable to this frame.
    pub fn changed_pixels(&self) -> u64 {
        match self {
            FrameOutcome::Detected(report) => report.statistics.changed_pixels,
            _ => 0,
        }
    }

    /// Returns true if the frame was ignored.
    pub fn is_skipped(&self) -> bool {
        matches!(self, FrameOutcome::Skipped(_))
    }
}

/// Motion detection engine for a single video stream.
///
/// Frames must be fed in arrival order from one thread at a time.
/// Statistics can be read concurrently through [`MotionDetector::monitor`].
pub struct MotionDetector {
    config: DetectorConfig,
    threshold: DifferenceThreshold,
    strategy: Box<dyn DetectionStrategy>,
    renderer: OverlayRenderer,
    shared: Arc<SharedState>,
    /// Unknown layout tags already reported.
    warned_layouts: HashSet<u32>,
}

impl MotionDetector {
    /// Creates a detector using the strategy named in `config`.
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        let threshold = config.difference_threshold()?;
        let strategy = config.strategy.build();
        tracing::info!(
            strategy = %config.strategy,
            threshold = threshold.value(),
            "Motion detector created"
        );
        Ok(Self {
            threshold,
            renderer: OverlayRenderer::new(config.highlight),
            shared: Arc::new(SharedState::new(config.strategy)),
            strategy,
            config,
            warned_layouts: HashSet::new(),
        })
    }

    /// Processes one frame, painting detected motion into it.
    ///
    /// Never fails: frames that cannot be compared are reported as
    /// [`FrameOutcome::Skipped`] and leave the detector untouched.
    pub fn process_frame(&mut self, frame: &mut PixelFrame) -> FrameOutcome {
        self.check_layout(frame);
        let current = extraction::to_intensity(frame);

        let reference = match self.shared.background.load() {
            Some(reference) => reference,
            None => {
                self.strategy.establish(&current);
                self.shared.background.replace(current);
                self.shared
                    .publish(MotionStatistics::quiet(frame.width(), frame.height(), frame.sequence()));
                tracing::debug!(
                    width = frame.width(),
                    height = frame.height(),
                    "Reference frame established"
                );
                return FrameOutcome::ReferenceEstablished;
            }
        };

        if reference.dimensions() != frame.dimensions() {
            let reason = SkipReason::DimensionMismatch {
                expected: reference.dimensions(),
                actual: frame.dimensions(),
            };
            tracing::warn!(
                expected = ?reference.dimensions(),
                actual = ?frame.dimensions(),
                sequence = frame.sequence(),
                "Frame size differs from reference, skipping"
            );
            return FrameOutcome::Skipped(reason);
        }

        match self.strategy.detect(&reference, current, self.threshold) {
            Detection::Priming { buffered } => {
                self.shared
                    .publish(MotionStatistics::quiet(frame.width(), frame.height(), frame.sequence()));
                tracing::trace!(buffered, "Window filling");
                FrameOutcome::Priming { buffered }
            }
            Detection::Complete {
                mask,
                next_reference,
            } => {
                if self.config.render_overlay {
                    self.renderer.render(frame, &mask);
                }
                let regions = if self.config.extract_regions {
                    mask.regions(self.config.min_region_area)
                } else {
                    Vec::new()
                };

                self.shared.background.replace(next_reference);

                let statistics = MotionStatistics {
                    width: frame.width(),
                    height: frame.height(),
                    changed_pixels: mask.changed_count() as u64,
                    sequence: frame.sequence(),
                };
                self.shared.publish(statistics);

                tracing::trace!(
                    changed = statistics.changed_pixels,
                    level = statistics.motion_level(),
                    regions = regions.len(),
                    "Frame processed"
                );
                FrameOutcome::Detected(MotionReport {
                    statistics,
                    regions,
                })
            }
        }
    }

    /// Returns the detector to its freshly constructed state.
    pub fn reset(&mut self) {
        self.strategy.reset();
        self.shared.background.clear();
        self.shared.publish(MotionStatistics::default());
        tracing::info!(strategy = %self.strategy.kind(), "Motion detector reset");
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DetectorState {
        if self.shared.background.is_empty() {
            return DetectorState::Uninitialized;
        }
        match self.strategy.phase() {
            Phase::Priming => DetectorState::Priming,
            Phase::Active => DetectorState::Active,
        }
    }

    /// Latest published statistics.
    pub fn statistics(&self) -> MotionStatistics {
        **self.shared.statistics.load()
    }

    /// Latest published motion level, in `[0, 1]`.
    pub fn motion_level(&self) -> f64 {
        self.statistics().motion_level()
    }

    /// Active detection strategy.
    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Configuration the detector was built with.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Handle for reading statistics from other threads.
    pub fn monitor(&self) -> MotionMonitor {
        MotionMonitor::new(Arc::clone(&self.shared))
    }

    fn check_layout(&mut self, frame: &PixelFrame) {
        let layout = frame.layout();
        if layout.is_recognized() || self.config.unknown_layout == UnknownLayoutPolicy::Fallback {
            return;
        }
        if let crate::capture::ChannelLayout::Other(tag) = layout {
            if self.warned_layouts.insert(tag) {
                tracing::warn!(
                    tag,
                    "Unrecognized channel layout, assuming red-first byte order"
                );
            }
        }
    }
}

impl std::fmt::Debug for MotionDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionDetector")
            .field("strategy", &self.strategy.kind())
            .field("threshold", &self.threshold.value())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ChannelLayout;
    use crate::detection::blob::CYCLE_LENGTH;
    use crate::overlay::HighlightColor;
    use std::thread;

    /// BGRA frame of uniform gray `base` with a `w x h` rect at `(x0, y0)` set to `value`.
    fn scene(width: u32, height: u32, base: u8, rect: Option<(u32, u32, u32, u32, u8)>) -> PixelFrame {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = match rect {
                    Some((x0, y0, w, h, value))
                        if x >= x0 && x < x0 + w && y >= y0 && y < y0 + h =>
                    {
                        value
                    }
                    _ => base,
                };
                pixels.extend_from_slice(&[v, v, v, 0xFF]);
            }
        }
        PixelFrame::new(pixels, width, height, ChannelLayout::Bgra8888, 0).unwrap()
    }

    fn detector(strategy: StrategyKind) -> MotionDetector {
        MotionDetector::new(DetectorConfig::with_strategy(strategy)).unwrap()
    }

    #[test]
    fn test_first_frame_establishes_reference() {
        let mut detector = detector(StrategyKind::TwoFrame);
        assert_eq!(detector.state(), DetectorState::Uninitialized);

        let outcome = detector.process_frame(&mut scene(8, 8, 50, None));
        assert_eq!(outcome, FrameOutcome::ReferenceEstablished);
        assert_eq!(outcome.motion_level(), 0.0);
        assert_eq!(detector.state(), DetectorState::Active);
        assert_eq!(detector.monitor().dimensions(), Some((8, 8)));
    }

    #[test]
    fn test_two_frame_counts_rectangle_and_replaces_reference() {
        let mut detector = detector(StrategyKind::TwoFrame);
        detector.process_frame(&mut scene(64, 48, 60, None));

        let mut second = scene(64, 48, 60, Some((10, 5, 20, 10, 160)));
        let expected_reference = extraction::to_intensity(&second);
        let outcome = detector.process_frame(&mut second);

        assert_eq!(outcome.changed_pixels(), 200);
        assert!((detector.motion_level() - 200.0 / (64.0 * 48.0)).abs() < 1e-12);
        assert_eq!(*detector.monitor().background().unwrap(), expected_reference);
    }

    #[test]
    fn test_overlay_painted_only_on_changed_pixels() {
        let config = DetectorConfig {
            highlight: HighlightColor::opaque(1, 2, 3),
            ..DetectorConfig::default()
        };
        let mut detector = MotionDetector::new(config).unwrap();
        detector.process_frame(&mut scene(4, 4, 60, None));

        let mut frame = scene(4, 4, 60, Some((1, 1, 1, 1, 200)));
        detector.process_frame(&mut frame);

        // BGRA: blue first
        assert_eq!(frame.pixel(1, 1), Some(&[3u8, 2, 1, 0xFF][..]));
        assert_eq!(frame.pixel(0, 0), Some(&[60u8, 60, 60, 0xFF][..]));
    }

    #[test]
    fn test_overlay_can_be_disabled() {
        let config = DetectorConfig {
            render_overlay: false,
            ..DetectorConfig::default()
        };
        let mut detector = MotionDetector::new(config).unwrap();
        detector.process_frame(&mut scene(4, 4, 60, None));

        let mut frame = scene(4, 4, 60, Some((0, 0, 2, 2, 200)));
        let before = frame.clone();
        let outcome = detector.process_frame(&mut frame);

        assert_eq!(outcome.changed_pixels(), 4);
        assert_eq!(frame.pixels(), before.pixels());
    }

    #[test]
    fn test_dimension_mismatch_is_skipped() {
        let mut detector = detector(StrategyKind::TwoFrame);
        detector.process_frame(&mut scene(640, 480, 10, None));
        let reference = detector.monitor().background().unwrap();
        let stats = detector.statistics();

        let outcome = detector.process_frame(&mut scene(320, 240, 250, None));
        assert_eq!(
            outcome,
            FrameOutcome::Skipped(SkipReason::DimensionMismatch {
                expected: (640, 480),
                actual: (320, 240),
            })
        );
        assert_eq!(outcome.changed_pixels(), 0);
        assert!(Arc::ptr_eq(&reference, &detector.monitor().background().unwrap()));
        assert_eq!(detector.statistics(), stats);
    }

    #[test]
    fn test_blob_skips_mismatched_frame_while_priming() {
        let mut detector = detector(StrategyKind::Blob);
        detector.process_frame(&mut scene(4, 4, 40, None));
        for _ in 2..CYCLE_LENGTH {
            detector.process_frame(&mut scene(4, 4, 40, None));
        }
        let stats = detector.statistics();

        let outcome = detector.process_frame(&mut scene(2, 2, 200, None));
        assert_eq!(
            outcome,
            FrameOutcome::Skipped(SkipReason::DimensionMismatch {
                expected: (4, 4),
                actual: (2, 2),
            })
        );
        assert_eq!(detector.state(), DetectorState::Priming);
        assert_eq!(detector.statistics(), stats);

        // The skipped frame was not buffered: the next valid frame is the 8th.
        let outcome = detector.process_frame(&mut scene(4, 4, 40, Some((0, 0, 1, 1, 200))));
        assert!(matches!(outcome, FrameOutcome::Detected(_)));
        assert_eq!(outcome.changed_pixels(), 1);
        assert_eq!(detector.state(), DetectorState::Active);
    }

    #[test]
    fn test_blob_cycles_every_window() {
        let mut detector = detector(StrategyKind::Blob);

        assert_eq!(
            detector.process_frame(&mut scene(16, 16, 40, None)),
            FrameOutcome::ReferenceEstablished
        );
        assert_eq!(detector.state(), DetectorState::Priming);

        for n in 2..CYCLE_LENGTH {
            let outcome = detector.process_frame(&mut scene(16, 16, 40, None));
            assert_eq!(outcome, FrameOutcome::Priming { buffered: n });
            assert_eq!(detector.motion_level(), 0.0);
        }

        // 8th frame: a 2x2 patch moved.
        let outcome = detector.process_frame(&mut scene(16, 16, 40, Some((3, 3, 2, 2, 140))));
        assert_eq!(outcome.changed_pixels(), 4);
        assert_eq!(detector.state(), DetectorState::Active);

        // The next frame opens a new window.
        let outcome = detector.process_frame(&mut scene(16, 16, 40, None));
        assert_eq!(outcome, FrameOutcome::Priming { buffered: 1 });
        assert_eq!(detector.state(), DetectorState::Priming);
    }

    #[test]
    fn test_blob_union_keeps_brief_motion() {
        let mut detector = detector(StrategyKind::Blob);
        detector.process_frame(&mut scene(8, 8, 40, None));

        let mut last = FrameOutcome::ReferenceEstablished;
        for n in 2..=CYCLE_LENGTH {
            let rect = if n == 3 { Some((0, 0, 1, 1, 200)) } else { None };
            last = detector.process_frame(&mut scene(8, 8, 40, rect));
        }
        assert_eq!(last.changed_pixels(), 1);
    }

    #[test]
    fn test_reset_behaves_like_fresh_detector() {
        for kind in StrategyKind::ALL {
            let mut detector = detector(kind);
            for i in 0..5u8 {
                detector.process_frame(&mut scene(8, 8, i * 40, None));
            }
            detector.reset();
            assert_eq!(detector.state(), DetectorState::Uninitialized);
            assert_eq!(detector.statistics(), MotionStatistics::default());

            let mut fresh = MotionDetector::new(DetectorConfig::with_strategy(kind)).unwrap();
            let a = detector.process_frame(&mut scene(8, 8, 200, None));
            let b = fresh.process_frame(&mut scene(8, 8, 200, None));
            assert_eq!(a, b);
            assert_eq!(detector.state(), fresh.state());
            assert_eq!(
                detector.monitor().background().map(|f| f.samples().to_vec()),
                fresh.monitor().background().map(|f| f.samples().to_vec())
            );
        }
    }

    #[test]
    fn test_regions_reported_when_enabled() {
        let config = DetectorConfig {
            extract_regions: true,
            min_region_area: 1,
            ..DetectorConfig::default()
        };
        let mut detector = MotionDetector::new(config).unwrap();
        detector.process_frame(&mut scene(20, 20, 30, None));

        match detector.process_frame(&mut scene(20, 20, 30, Some((4, 6, 5, 3, 220)))) {
            FrameOutcome::Detected(report) => {
                assert_eq!(report.regions.len(), 1);
                let region = report.regions[0];
                assert_eq!((region.x, region.y, region.width, region.height), (4, 6, 5, 3));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_layout_still_processed() {
        let mut detector = detector(StrategyKind::TwoFrame);
        let mut first = PixelFrame::new(vec![0; 16], 2, 2, ChannelLayout::Other(7), 0).unwrap();
        let mut second = PixelFrame::new(vec![255; 16], 2, 2, ChannelLayout::Other(7), 1).unwrap();

        detector.process_frame(&mut first);
        let outcome = detector.process_frame(&mut second);
        assert_eq!(outcome.changed_pixels(), 4);
        assert!(detector.warned_layouts.contains(&7));
    }

    #[test]
    fn test_monitor_reads_from_other_thread() {
        let mut detector = detector(StrategyKind::TwoFrame);
        let monitor = detector.monitor();

        let producer = thread::spawn(move || {
            for i in 0..50u32 {
                let base = if i % 2 == 0 { 20 } else { 220 };
                detector.process_frame(&mut scene(8, 8, base, None));
            }
            detector
        });

        for _ in 0..50 {
            let stats = monitor.statistics();
            assert!(stats.changed_pixels <= stats.pixel_count());
            assert!((0.0..=1.0).contains(&stats.motion_level()));
        }

        let detector = producer.join().unwrap();
        assert_eq!(monitor.statistics(), detector.statistics());
        assert_eq!(monitor.motion_level(), 1.0);
    }
}
