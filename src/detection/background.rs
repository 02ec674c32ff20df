//! Reference frame shared between the processing thread and readers.

use crate::extraction::IntensityFrame;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Holds the most recent reference intensity frame.
///
/// The frame is published through a single atomic slot. Readers on other
/// threads see either the previous reference or the new one, never a
/// partially written frame. Dimensions travel with the frame, so they can
/// never disagree with it.
#[derive(Default)]
pub struct BackgroundModel {
    reference: ArcSwapOption<IntensityFrame>,
}

impl BackgroundModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current reference, if one has been established.
    pub fn load(&self) -> Option<Arc<IntensityFrame>> {
        self.reference.load_full()
    }

    /// Publishes `frame` as the new reference.
    pub fn replace(&self, frame: IntensityFrame) {
        self.reference.store(Some(Arc::new(frame)));
    }

    /// Discards the reference.
    pub fn clear(&self) {
        self.reference.store(None);
    }

    /// Dimensions of the current reference.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.reference.load_full().map(|frame| frame.dimensions())
    }

    /// Returns true before a reference is established.
    pub fn is_empty(&self) -> bool {
        self.reference.load().is_none()
    }
}

impl std::fmt::Debug for BackgroundModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundModel")
            .field("dimensions", &self.dimensions())
            .finish()
    }
}
