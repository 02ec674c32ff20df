//! Published motion statistics and the cross-thread reader handle.

use super::background::BackgroundModel;
use super::strategy::StrategyKind;
use crate::extraction::IntensityFrame;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Motion statistics of the most recently processed frame or window.
///
/// Published as one immutable value, so a reader never pairs a new count
/// with old dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionStatistics {
    /// Width of the frame the statistics describe.
    pub width: u32,
    /// Height of the frame the statistics describe.
    pub height: u32,
    /// Pixels classified as motion.
    pub changed_pixels: u64,
    /// Sequence number of the frame that produced these statistics.
    pub sequence: u64,
}

impl MotionStatistics {
    /// Zero-motion statistics for a frame of the given size.
    pub fn quiet(width: u32, height: u32, sequence: u64) -> Self {
        Self {
            width,
            height,
            changed_pixels: 0,
            sequence,
        }
    }

    /// Total pixels covered.
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Fraction of changed pixels in `[0, 1]`. Zero before any frame.
    pub fn motion_level(&self) -> f64 {
        match self.pixel_count() {
            0 => 0.0,
            total => self.changed_pixels as f64 / total as f64,
        }
    }
}

/// State written by the processing thread and readable from anywhere.
pub(crate) struct SharedState {
    pub(crate) strategy: StrategyKind,
    pub(crate) background: BackgroundModel,
    pub(crate) statistics: ArcSwap<MotionStatistics>,
}

impl SharedState {
    pub(crate) fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            background: BackgroundModel::new(),
            statistics: ArcSwap::from_pointee(MotionStatistics::default()),
        }
    }

    pub(crate) fn publish(&self, statistics: MotionStatistics) {
        self.statistics.store(Arc::new(statistics));
    }
}

/// Read-only view of a detector for status and display threads.
///
/// Cheap to clone. Reads never block the processing thread.
#[derive(Clone)]
pub struct MotionMonitor {
    shared: Arc<SharedState>,
}

impl MotionMonitor {
    pub(crate) fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Latest published statistics.
    pub fn statistics(&self) -> MotionStatistics {
        **self.shared.statistics.load()
    }

    /// Latest published motion level.
    pub fn motion_level(&self) -> f64 {
        self.statistics().motion_level()
    }

    /// Strategy the detector was built with.
    pub fn strategy(&self) -> StrategyKind {
        self.shared.strategy
    }

    /// Current reference frame, if established.
    pub fn background(&self) -> Option<Arc<IntensityFrame>> {
        self.shared.background.load()
    }

    /// Dimensions of the current reference frame.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.shared.background.dimensions()
    }
}

impl std::fmt::Debug for MotionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionMonitor")
            .field("strategy", &self.shared.strategy)
            .field("statistics", &self.statistics())
            .finish()
    }
}
