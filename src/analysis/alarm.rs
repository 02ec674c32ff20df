//! Motion alarm.
//!
//! Raises an event when the published motion level stays above a
//! configured level for enough consecutive frames, and clears on the first
//! quiet frame.

use crate::capture::ConfigError;
use crate::detection::MotionStatistics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alarm configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Motion level above which a frame counts as active.
    pub level: f64,
    /// Consecutive active frames required before raising the alarm.
    pub min_active_frames: u32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            level: 0.01,
            min_active_frames: 1,
        }
    }
}

impl AlarmConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.level) {
            return Err(ConfigError::InvalidAlarmLevel(self.level));
        }
        Ok(())
    }
}

/// Raised when the alarm turns on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmEvent {
    /// Motion level of the frame that raised the alarm.
    pub motion_level: f64,
    /// Sequence number of that frame.
    pub sequence: u64,
    /// Wall-clock time the alarm was raised.
    pub raised_at: DateTime<Utc>,
}

/// Tracks motion levels and decides when to ring.
#[derive(Debug)]
pub struct MotionAlarm {
    config: AlarmConfig,
    /// Consecutive frames above the level.
    consecutive_active: u32,
    active: bool,
    events_raised: u64,
    last_event: Option<AlarmEvent>,
}

impl MotionAlarm {
    /// Creates an alarm with the given configuration.
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            config,
            consecutive_active: 0,
            active: false,
            events_raised: 0,
            last_event: None,
        }
    }

    /// Feeds one set of statistics. Returns an event when the alarm turns on.
    pub fn observe(&mut self, stats: &MotionStatistics) -> Option<AlarmEvent> {
        let level = stats.motion_level();

        if level <= self.config.level {
            if self.active {
                tracing::info!(sequence = stats.sequence, "Motion alarm cleared");
            }
            self.active = false;
            self.consecutive_active = 0;
            return None;
        }

        self.consecutive_active = self.consecutive_active.saturating_add(1);
        if self.active || self.consecutive_active < self.config.min_active_frames.max(1) {
            return None;
        }

        self.active = true;
        self.events_raised += 1;
        let event = AlarmEvent {
            motion_level: level,
            sequence: stats.sequence,
            raised_at: Utc::now(),
        };
        tracing::warn!(
            level,
            sequence = stats.sequence,
            "Motion alarm raised"
        );
        self.last_event = Some(event.clone());
        Some(event)
    }

    /// Returns true while the alarm is on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of times the alarm has turned on.
    pub fn events_raised(&self) -> u64 {
        self.events_raised
    }

    /// Most recent event, if any.
    pub fn last_event(&self) -> Option<&AlarmEvent> {
        self.last_event.as_ref()
    }

    /// Resets the alarm to initial state.
    pub fn reset(&mut self) {
        self.consecutive_active = 0;
        self.active = false;
        self.events_raised = 0;
        self.last_event = None;
    }
}

impl Default for MotionAlarm {
    fn default() -> Self {
        Self::new(AlarmConfig::default())
    }
}
