use crate::config::ThresholdTable;
use crate::error::CoachResult;
use crate::models::{
    min_angle, AngleMap, ExerciseEvent, ExerciseSession, ExerciseType, Feedback, Joint, PoseFrame,
    PositionSource,
};

use super::crossing::{self, Crossing, HysteresisBand, PaceLimits};
use super::heuristic::ProximityHeuristic;
use super::ExerciseAnalyzer;

/// Lunge: counted on the more bent (front) knee, checked on the back knee
pub struct LungeAnalyzer {
    exercise: ExerciseType,
    knee_band: HysteresisBand,
    pace: PaceLimits,
    back_knee_max: f32,
    fallback: ProximityHeuristic,
}

impl LungeAnalyzer {
    pub fn from_table(table: &ThresholdTable, min_confidence: f32) -> CoachResult<Self> {
        Ok(Self {
            exercise: ExerciseType::Lunge,
            knee_band: HysteresisBand::from_table(
                table,
                "kneeAngleStart",
                "kneeAngleEnd",
                Crossing::Below,
            )?,
            pace: PaceLimits::from_table(table)?,
            back_knee_max: table.get("backKneeMax")?,
            fallback: ProximityHeuristic::from_table(table, min_confidence)?,
        })
    }

    fn entry_feedback(&self, angles: &AngleMap, front: Joint) -> Option<Feedback> {
        let back = match front {
            Joint::LeftKnee => Joint::RightKnee,
            _ => Joint::LeftKnee,
        };
        let back_angle = angles.get(&back).filter(|a| a.is_valid)?;
        (back_angle.angle_degrees > self.back_knee_max)
            .then(|| Feedback::advisory("Lower your back knee further towards the floor"))
    }
}

impl ExerciseAnalyzer for LungeAnalyzer {
    fn exercise(&self) -> &ExerciseType {
        &self.exercise
    }

    fn analyze(
        &self,
        session: &mut ExerciseSession,
        angles: &AngleMap,
        frame: &PoseFrame,
        now_ms: i64,
    ) -> Vec<ExerciseEvent> {
        match min_angle(angles, &[Joint::LeftKnee, Joint::RightKnee]) {
            Some((front, knee)) => crossing::advance(
                session,
                &self.knee_band,
                Some(&self.pace),
                knee,
                PositionSource::Angles,
                now_ms,
                || self.entry_feedback(angles, front),
            ),
            None => self.fallback.advance(session, frame, Some(&self.pace), now_ms),
        }
    }
}
