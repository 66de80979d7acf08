use crate::config::ThresholdTable;
use crate::error::CoachResult;
use crate::models::{
    mean_angle, AngleMap, BodyLandmark, ExerciseEvent, ExerciseSession, ExerciseType, Feedback,
    Joint, PoseFrame, PositionSource,
};

use super::crossing::{self, Crossing, HysteresisBand, PaceLimits};
use super::heuristic::ProximityHeuristic;
use super::ExerciseAnalyzer;

/// Jumping jack: counted on the shoulder (arm raise) angle, checked on foot spread
pub struct JumpingJackAnalyzer {
    exercise: ExerciseType,
    arm_band: HysteresisBand,
    pace: PaceLimits,
    stance_width_ratio_min: f32,
    fallback: ProximityHeuristic,
    min_confidence: f32,
}

impl JumpingJackAnalyzer {
    pub fn from_table(table: &ThresholdTable, min_confidence: f32) -> CoachResult<Self> {
        Ok(Self {
            exercise: ExerciseType::JumpingJack,
            arm_band: HysteresisBand::from_table(
                table,
                "armAngleStart",
                "armAngleEnd",
                Crossing::Above,
            )?,
            pace: PaceLimits::from_table(table)?,
            stance_width_ratio_min: table.get("stanceWidthRatioMin")?,
            fallback: ProximityHeuristic::from_table(table, min_confidence)?,
            min_confidence,
        })
    }

    fn entry_feedback(&self, frame: &PoseFrame) -> Option<Feedback> {
        let feet = frame.horizontal_span(
            BodyLandmark::LeftAnkle,
            BodyLandmark::RightAnkle,
            self.min_confidence,
        )?;
        let hips = frame.horizontal_span(
            BodyLandmark::LeftHip,
            BodyLandmark::RightHip,
            self.min_confidence,
        )?;
        (hips > 0.0 && feet / hips < self.stance_width_ratio_min)
            .then(|| Feedback::advisory("Jump your feet wider as your arms go up"))
    }
}

impl ExerciseAnalyzer for JumpingJackAnalyzer {
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
        match mean_angle(angles, &[Joint::LeftShoulder, Joint::RightShoulder]) {
            Some(arms) => crossing::advance(
                session,
                &self.arm_band,
                Some(&self.pace),
                arms,
                PositionSource::Angles,
                now_ms,
                || self.entry_feedback(frame),
            ),
            None => self.fallback.advance(session, frame, Some(&self.pace), now_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analyzers::test_support::{angles, standing_frame};
    use assert_matches::assert_matches;

    fn analyzer() -> JumpingJackAnalyzer {
        JumpingJackAnalyzer::from_table(&ThresholdTable::defaults(&ExerciseType::JumpingJack), 0.5)
            .unwrap()
    }

    fn arms(angle: f32) -> AngleMap {
        angles(&[(Joint::LeftShoulder, angle), (Joint::RightShoulder, angle)])
    }

    #[test]
    fn test_counts_arm_raises() {
        let analyzer = analyzer();
        let mut session = ExerciseSession::new(ExerciseType::JumpingJack);
        let frame = standing_frame(0);

        for (i, angle) in [20.0, 90.0, 150.0, 130.0, 60.0, 160.0, 25.0].into_iter().enumerate() {
            analyzer.analyze(&mut session, &arms(angle), &frame, i as i64 * 250);
        }

        assert_eq!(session.repetition_count, 2);
    }

    #[test]
    fn test_narrow_feet_warn_on_arm_raise() {
        let analyzer = analyzer();
        let mut session = ExerciseSession::new(ExerciseType::JumpingJack);

        // Ankles 0.18 apart over hips 0.10 apart clears the default 1.5 ratio
        let events = analyzer.analyze(&mut session, &arms(150.0), &standing_frame(0), 0);
        assert_matches!(
            events.as_slice(),
            [ExerciseEvent::StateChanged { in_position: true, feedback: None, .. }]
        );

        let mut frame = standing_frame(500);
        frame.landmarks[BodyLandmark::LeftAnkle.index()].x = 0.46;
        frame.landmarks[BodyLandmark::RightAnkle.index()].x = 0.54;
        analyzer.analyze(&mut session, &arms(40.0), &frame, 500);
        let events = analyzer.analyze(&mut session, &arms(150.0), &frame, 1_000);
        assert_matches!(
            events.as_slice(),
            [ExerciseEvent::StateChanged { in_position: true, feedback: Some(f), .. }]
                if f.message.contains("feet wider")
        );
    }
}
