use crate::config::ThresholdTable;
use crate::error::CoachResult;
use crate::models::{
    mean_angle, AngleMap, BodyLandmark, ExerciseEvent, ExerciseSession, ExerciseType, Feedback,
    Joint, PoseFrame, PositionSource,
};

use super::crossing::{self, Crossing, HysteresisBand, PaceLimits};
use super::heuristic::ProximityHeuristic;
use super::ExerciseAnalyzer;

/// Squat: counted on the knee angle, checked for torso lean and stance width
pub struct SquatAnalyzer {
    exercise: ExerciseType,
    knee_band: HysteresisBand,
    pace: PaceLimits,
    hip_angle_min: f32,
    stance_width_ratio_min: f32,
    fallback: ProximityHeuristic,
    min_confidence: f32,
}

impl SquatAnalyzer {
    pub fn from_table(table: &ThresholdTable, min_confidence: f32) -> CoachResult<Self> {
        Ok(Self {
            exercise: ExerciseType::Squat,
            knee_band: HysteresisBand::from_table(
                table,
                "kneeAngleStart",
                "kneeAngleEnd",
                Crossing::Below,
            )?,
            pace: PaceLimits::from_table(table)?,
            hip_angle_min: table.get("hipAngleMin")?,
            stance_width_ratio_min: table.get("stanceWidthRatioMin")?,
            fallback: ProximityHeuristic::from_table(table, min_confidence)?,
            min_confidence,
        })
    }

    fn entry_feedback(&self, angles: &AngleMap, frame: &PoseFrame) -> Option<Feedback> {
        if let Some(hip) = mean_angle(angles, &[Joint::LeftHip, Joint::RightHip]) {
            if hip < self.hip_angle_min {
                return Some(Feedback::critical(
                    "Keep your chest up, you are leaning too far forward",
                ));
            }
        }

        let feet = frame.horizontal_span(
            BodyLandmark::LeftAnkle,
            BodyLandmark::RightAnkle,
            self.min_confidence,
        );
        let shoulders = frame.horizontal_span(
            BodyLandmark::LeftShoulder,
            BodyLandmark::RightShoulder,
            self.min_confidence,
        );
        if let (Some(feet), Some(shoulders)) = (feet, shoulders) {
            if shoulders > 0.0 && feet / shoulders < self.stance_width_ratio_min {
                return Some(Feedback::advisory("Widen your stance to about shoulder width"));
            }
        }

        None
    }
}

impl ExerciseAnalyzer for SquatAnalyzer {
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
        match mean_angle(angles, &[Joint::LeftKnee, Joint::RightKnee]) {
            Some(knee) => crossing::advance(session, &self.knee_band, Some(&self.pace), knee, PositionSource::Angles, now_ms, || {
                self.entry_feedback(angles, frame)
            }),
            None => self.fallback.advance(session, frame, Some(&self.pace), now_ms),
        }
    }
}
