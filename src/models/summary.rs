use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::exercise::ExerciseType;
use super::session::ExerciseSession;

/// Finished-session record handed to stats/persistence collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub session_id: Uuid,
    pub exercise: ExerciseType,
    pub started_at: DateTime<Utc>,
    pub repetition_count: u32,
    /// From the first to the last processed frame
    pub total_duration_ms: i64,
    pub repetition_durations_ms: Vec<i64>,
    pub average_repetition_duration_ms: Option<f64>,
    /// No scoring model is defined yet; always None
    pub quality_score: Option<f32>,
}

impl WorkoutSummary {
    pub fn from_session(session: &ExerciseSession) -> Self {
        let total_duration_ms = match (session.first_frame_ms, session.last_frame_ms) {
            (Some(first), Some(last)) => (last - first).max(0),
            _ => 0,
        };

        let history = &session.repetition_durations_ms;
        let average_repetition_duration_ms = if history.is_empty() {
            None
        } else {
            Some(history.iter().sum::<i64>() as f64 / history.len() as f64)
        };

        Self {
            session_id: session.id,
            exercise: session.exercise.clone(),
            started_at: session.started_at,
            repetition_count: session.repetition_count,
            total_duration_ms,
            repetition_durations_ms: history.clone(),
            average_repetition_duration_ms,
            quality_score: None,
        }
    }
}
