use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::exercise::ExerciseType;

/// Hold-exercise bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldProgress {
    /// Last progress bucket reported (elapsed seconds / interval)
    pub last_reported_bucket: Option<u32>,
    /// Completion is credited at most once per session
    pub completed: bool,
}

/// Measurement that moved the session into position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    /// The exercise's primary joint angle
    Angles,
    /// The hip/ankle coordinate fallback
    Heuristic,
}

/// Mutable state of one exercise session
///
/// Owned by the pipeline and handed to the active analyzer for each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    pub id: Uuid,
    pub exercise: ExerciseType,
    pub started_at: DateTime<Utc>,
    pub in_position: bool,
    pub repetition_count: u32,
    /// Frame time at which the current position or hold was entered
    pub position_started_ms: Option<i64>,
    /// Only this source may complete the current cycle
    pub position_source: Option<PositionSource>,
    pub last_repetition_duration_ms: Option<i64>,
    pub repetition_durations_ms: Vec<i64>,
    pub frames_without_subject: u32,
    pub hold: HoldProgress,
    pub first_frame_ms: Option<i64>,
    pub last_frame_ms: Option<i64>,
}

impl ExerciseSession {
    pub fn new(exercise: ExerciseType) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise,
            started_at: Utc::now(),
            in_position: false,
            repetition_count: 0,
            position_started_ms: None,
            position_source: None,
            last_repetition_duration_ms: None,
            repetition_durations_ms: Vec::new(),
            frames_without_subject: 0,
            hold: HoldProgress::default(),
            first_frame_ms: None,
            last_frame_ms: None,
        }
    }

    /// Enter the tracked position at `now_ms`
    pub fn enter_position(&mut self, now_ms: i64, source: PositionSource) {
        debug_assert!(!self.in_position);
        self.in_position = true;
        self.position_started_ms = Some(now_ms);
        self.position_source = Some(source);
    }

    /// Leave the tracked position and record how long it lasted
    pub fn leave_position(&mut self, now_ms: i64) -> i64 {
        debug_assert!(self.in_position);
        let duration = self
            .position_started_ms
            .take()
            .map(|start| now_ms.saturating_sub(start).max(0))
            .unwrap_or(0);
        self.in_position = false;
        self.position_source = None;
        self.last_repetition_duration_ms = Some(duration);
        self.repetition_durations_ms.push(duration);
        duration
    }

    /// Drop the current position without crediting or recording it
    pub fn abandon_position(&mut self) {
        self.in_position = false;
        self.position_started_ms = None;
        self.position_source = None;
    }

    /// Time spent in the current position, if any
    pub fn elapsed_in_position_ms(&self, now_ms: i64) -> Option<i64> {
        self.position_started_ms
            .map(|start| now_ms.saturating_sub(start).max(0))
    }

    /// Mark a frame as processed for duration accounting
    pub fn observe_frame(&mut self, now_ms: i64) {
        self.first_frame_ms.get_or_insert(now_ms);
        self.last_frame_ms = Some(now_ms);
    }

    /// Fresh session for the same exercise, keeping nothing from this one
    pub fn reset(&mut self) {
        *self = Self::new(self.exercise.clone());
    }
}
