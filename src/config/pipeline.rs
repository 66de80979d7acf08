use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{CoachError, CoachResult};

/// Pipeline-wide tuning that is independent of the exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Consecutive no-subject frames before the session is reset
    #[serde(default = "default_reset_delay_frames")]
    pub reset_delay_frames: u32,

    /// Minimum visibility and presence for a landmark to feed an angle
    #[serde(default = "default_min_landmark_confidence")]
    pub min_landmark_confidence: f32,

    /// Analyze smoothed angles instead of raw ones
    #[serde(default = "default_true")]
    pub use_filtered_angles: bool,

    /// Step applied to non-increasing frame timestamps
    #[serde(default = "default_timestamp_epsilon_ms")]
    pub timestamp_epsilon_ms: i64,

    #[serde(default = "default_true")]
    pub detect_anomalies: bool,
}

fn default_reset_delay_frames() -> u32 {
    10
}

fn default_min_landmark_confidence() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_timestamp_epsilon_ms() -> i64 {
    1
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reset_delay_frames: default_reset_delay_frames(),
            min_landmark_confidence: default_min_landmark_confidence(),
            use_filtered_angles: default_true(),
            timestamp_epsilon_ms: default_timestamp_epsilon_ms(),
            detect_anomalies: default_true(),
        }
    }
}

impl PipelineConfig {
    /// Parse a `[pipeline]`-style TOML table
    pub fn from_toml_str(contents: &str) -> CoachResult<Self> {
        let config: PipelineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `REP_COACH_*` environment overrides on top of this config
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(value) = env::var("REP_COACH_RESET_DELAY_FRAMES") {
            self.reset_delay_frames = value
                .parse()
                .context("REP_COACH_RESET_DELAY_FRAMES must be an integer")?;
        }
        if let Ok(value) = env::var("REP_COACH_MIN_LANDMARK_CONFIDENCE") {
            self.min_landmark_confidence = value
                .parse()
                .context("REP_COACH_MIN_LANDMARK_CONFIDENCE must be a number")?;
        }
        if let Ok(value) = env::var("REP_COACH_USE_FILTERED_ANGLES") {
            self.use_filtered_angles = value
                .parse()
                .context("REP_COACH_USE_FILTERED_ANGLES must be true or false")?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> CoachResult<()> {
        if self.reset_delay_frames == 0 {
            return Err(CoachError::InvalidConfig(
                "reset_delay_frames must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_landmark_confidence) {
            return Err(CoachError::InvalidConfig(format!(
                "min_landmark_confidence must be within [0, 1], got {}",
                self.min_landmark_confidence
            )));
        }
        if self.timestamp_epsilon_ms <= 0 {
            return Err(CoachError::InvalidConfig(
                "timestamp_epsilon_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
