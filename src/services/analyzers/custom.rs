use crate::config::ThresholdTable;
use crate::error::CoachResult;
use crate::models::{AngleMap, ExerciseEvent, ExerciseSession, ExerciseType, PoseFrame};

use super::heuristic::ProximityHeuristic;
use super::ExerciseAnalyzer;

/// User-defined exercise without a geometric model
///
/// Counts with the hip/ankle proximity heuristic regardless of the declared
/// motion. Joint angles are ignored and no pace feedback is given.
pub struct CustomAnalyzer {
    exercise: ExerciseType,
    heuristic: ProximityHeuristic,
}

impl CustomAnalyzer {
    pub fn from_table(table: &ThresholdTable, min_confidence: f32) -> CoachResult<Self> {
        Ok(Self {
            exercise: table.exercise().clone(),
            heuristic: ProximityHeuristic::from_table(table, min_confidence)?,
        })
    }
}

impl ExerciseAnalyzer for CustomAnalyzer {
    fn exercise(&self) -> &ExerciseType {
        &self.exercise
    }

    fn analyze(
        &self,
        session: &mut ExerciseSession,
        _angles: &AngleMap,
        frame: &PoseFrame,
        now_ms: i64,
    ) -> Vec<ExerciseEvent> {
        self.heuristic.advance(session, frame, None, now_ms)
    }
}
