use crate::config::ThresholdTable;
use crate::error::CoachResult;
use crate::models::{
    mean_angle, AngleMap, ExerciseEvent, ExerciseSession, ExerciseType, Feedback, Joint, PoseFrame,
    PositionSource,
};

use super::crossing::{self, Crossing, HysteresisBand, PaceLimits};
use super::heuristic::ProximityHeuristic;
use super::ExerciseAnalyzer;

/// Push-up: counted on the elbow angle, checked for a straight body line
pub struct PushUpAnalyzer {
    exercise: ExerciseType,
    elbow_band: HysteresisBand,
    pace: PaceLimits,
    body_line_min: f32,
    fallback: ProximityHeuristic,
}

impl PushUpAnalyzer {
    pub fn from_table(table: &ThresholdTable, min_confidence: f32) -> CoachResult<Self> {
        Ok(Self {
            exercise: ExerciseType::PushUp,
            elbow_band: HysteresisBand::from_table(
                table,
                "elbowAngleStart",
                "elbowAngleEnd",
                Crossing::Below,
            )?,
            pace: PaceLimits::from_table(table)?,
            body_line_min: table.get("bodyLineMin")?,
            fallback: ProximityHeuristic::from_table(table, min_confidence)?,
        })
    }

    fn entry_feedback(&self, angles: &AngleMap) -> Option<Feedback> {
        let body = mean_angle(angles, &[Joint::LeftBodyLine, Joint::RightBodyLine])?;
        (body < self.body_line_min)
            .then(|| Feedback::critical("Keep your body in a straight line, hips are sagging or piked"))
    }
}

impl ExerciseAnalyzer for PushUpAnalyzer {
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
        match mean_angle(angles, &[Joint::LeftElbow, Joint::RightElbow]) {
            Some(elbow) => crossing::advance(
                session,
                &self.elbow_band,
                Some(&self.pace),
                elbow,
                PositionSource::Angles,
                now_ms,
                || self.entry_feedback(angles),
            ),
            None => self.fallback.advance(session, frame, Some(&self.pace), now_ms),
        }
    }
}
