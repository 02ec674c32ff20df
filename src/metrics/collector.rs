//! Metrics collection and registry.

use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registering or encoding a metric failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of pipeline state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Frames handed to the detector.
    pub frames_processed: u64,
    /// Frames skipped because their size did not match the reference.
    pub frames_skipped: u64,
    /// Changed pixels in the latest published statistics.
    pub changed_pixels: u64,
    /// Latest published motion level.
    pub motion_level: f64,
    /// Whether the motion alarm is on.
    pub alarm_active: bool,
    /// Total alarm activations.
    pub alarms_raised: u64,
    /// Current delivery rate.
    pub current_fps: f64,
}

/// Prometheus metrics registry for motion monitoring.
pub struct MetricsRegistry {
    registry: Registry,

    // Throughput
    frames_processed: IntCounter,
    frames_skipped: IntCounter,
    current_fps: Gauge,

    // Motion
    changed_pixels: IntGauge,
    motion_level: Gauge,

    // Alarm
    alarm_active: IntGauge,
    alarms_raised: IntCounter,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all motion metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_processed = IntCounter::new(
            "motion_detection_frames_processed_total",
            "Total number of frames handed to the detector",
        )?;
        let frames_skipped = IntCounter::new(
            "motion_detection_frames_skipped_total",
            "Frames skipped because their size differed from the reference",
        )?;
        let current_fps = Gauge::new(
            "motion_detection_current_fps",
            "Frame delivery rate over the last window",
        )?;

        let changed_pixels = IntGauge::new(
            "motion_detection_changed_pixels",
            "Pixels classified as motion in the latest result",
        )?;
        let motion_level = Gauge::new(
            "motion_detection_motion_level",
            "Fraction of pixels classified as motion (0-1)",
        )?;

        let alarm_active = IntGauge::new(
            "motion_detection_alarm_active",
            "Motion alarm status (1=active, 0=quiet)",
        )?;
        let alarms_raised = IntCounter::new(
            "motion_detection_alarms_raised_total",
            "Total number of motion alarms raised",
        )?;

        registry.register(Box::new(frames_processed.clone()))?;
        registry.register(Box::new(frames_skipped.clone()))?;
        registry.register(Box::new(current_fps.clone()))?;
        registry.register(Box::new(changed_pixels.clone()))?;
        registry.register(Box::new(motion_level.clone()))?;
        registry.register(Box::new(alarm_active.clone()))?;
        registry.register(Box::new(alarms_raised.clone()))?;

        Ok(Self {
            registry,
            frames_processed,
            frames_skipped,
            current_fps,
            changed_pixels,
            motion_level,
            alarm_active,
            alarms_raised,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        advance(&self.frames_processed, snapshot.frames_processed);
        advance(&self.frames_skipped, snapshot.frames_skipped);
        advance(&self.alarms_raised, snapshot.alarms_raised);

        self.current_fps.set(snapshot.current_fps);
        self.changed_pixels.set(snapshot.changed_pixels as i64);
        self.motion_level.set(snapshot.motion_level);
        self.alarm_active.set(if snapshot.alarm_active { 1 } else { 0 });
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Counters only move forward; bring `counter` up to `total`.
fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

impl MetricsSnapshot {
    /// Builds a snapshot from the pipeline components.
    pub fn from_components(
        monitor: &crate::detection::MotionMonitor,
        alarm: &crate::analysis::MotionAlarm,
        rate: &crate::analysis::FrameRate,
        frames_skipped: u64,
    ) -> Self {
        let stats = monitor.statistics();
        Self {
            frames_processed: rate.frames,
            frames_skipped,
            changed_pixels: stats.changed_pixels,
            motion_level: stats.motion_level(),
            alarm_active: alarm.is_active(),
            alarms_raised: alarm.events_raised(),
            current_fps: rate.current_fps,
        }
    }
}
