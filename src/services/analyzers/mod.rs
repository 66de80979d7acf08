//! Exercise analyzers
//!
//! One analyzer per exercise kind, all behind the same `ExerciseAnalyzer`
//! contract. Analyzers hold only their thresholds; every piece of mutable
//! state lives in the `ExerciseSession` handed in for each frame.

mod crossing;
mod custom;
mod heuristic;
mod jumping_jack;
mod lunge;
mod plank;
mod push_up;
mod squat;

pub use crossing::{Crossing, HysteresisBand, PaceLimits};
pub use custom::CustomAnalyzer;
pub use heuristic::ProximityHeuristic;
pub use jumping_jack::JumpingJackAnalyzer;
pub use lunge::LungeAnalyzer;
pub use plank::PlankAnalyzer;
pub use push_up::PushUpAnalyzer;
pub use squat::SquatAnalyzer;

use crate::config::ThresholdTable;
use crate::error::CoachResult;
use crate::models::{AngleMap, ExerciseEvent, ExerciseSession, ExerciseType, PoseFrame};

/// Per-exercise rules turning angles and landmarks into session transitions
pub trait ExerciseAnalyzer: Send + Sync {
    fn exercise(&self) -> &ExerciseType;

    /// Advance `session` by one frame observed at `now_ms`
    ///
    /// `angles` may lack the joints the exercise needs; analyzers then fall
    /// back to the coordinate heuristic on `frame` instead of failing.
    fn analyze(
        &self,
        session: &mut ExerciseSession,
        angles: &AngleMap,
        frame: &PoseFrame,
        now_ms: i64,
    ) -> Vec<ExerciseEvent>;
}

/// Build the analyzer for the table's exercise
pub fn analyzer_for(
    table: &ThresholdTable,
    min_confidence: f32,
) -> CoachResult<Box<dyn ExerciseAnalyzer>> {
    let analyzer: Box<dyn ExerciseAnalyzer> = match table.exercise() {
        ExerciseType::Squat => Box::new(SquatAnalyzer::from_table(table, min_confidence)?),
        ExerciseType::PushUp => Box::new(PushUpAnalyzer::from_table(table, min_confidence)?),
        ExerciseType::Lunge => Box::new(LungeAnalyzer::from_table(table, min_confidence)?),
        ExerciseType::JumpingJack => {
            Box::new(JumpingJackAnalyzer::from_table(table, min_confidence)?)
        }
        ExerciseType::Plank => Box::new(PlankAnalyzer::from_table(table, min_confidence)?),
        ExerciseType::Custom(_) => Box::new(CustomAnalyzer::from_table(table, min_confidence)?),
    };
    Ok(analyzer)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{AngleMap, BodyLandmark, Joint, JointAngle, Landmark, PoseFrame, LANDMARK_COUNT};

    /// Upright subject, feet slightly wider than shoulders
    pub fn standing_frame(timestamp_ms: i64) -> PoseFrame {
        use BodyLandmark::*;
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        let mut set = |point: BodyLandmark, x: f32, y: f32| {
            landmarks[point.index()] = Landmark::new(x, y, 0.0);
        };
        set(Nose, 0.5, 0.1);
        set(LeftShoulder, 0.42, 0.25);
        set(RightShoulder, 0.58, 0.25);
        set(LeftElbow, 0.40, 0.4);
        set(RightElbow, 0.60, 0.4);
        set(LeftWrist, 0.40, 0.52);
        set(RightWrist, 0.60, 0.52);
        set(LeftHip, 0.45, 0.5);
        set(RightHip, 0.55, 0.5);
        set(LeftKnee, 0.45, 0.7);
        set(RightKnee, 0.55, 0.7);
        set(LeftAnkle, 0.41, 0.9);
        set(RightAnkle, 0.59, 0.9);
        PoseFrame::new(timestamp_ms, landmarks)
    }

    /// Same subject with the hips dropped towards the ankles
    pub fn crouched_frame(timestamp_ms: i64) -> PoseFrame {
        let mut frame = standing_frame(timestamp_ms);
        frame.landmarks[BodyLandmark::LeftHip.index()].y = 0.7;
        frame.landmarks[BodyLandmark::RightHip.index()].y = 0.7;
        frame
    }

    pub fn angles(values: &[(Joint, f32)]) -> AngleMap {
        values
            .iter()
            .map(|(joint, angle)| (*joint, JointAngle::new(*joint, *angle, 1.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_every_exercise() {
        let mut exercises = ExerciseType::NAMED.to_vec();
        exercises.push(ExerciseType::Custom("burpee".to_string()));

        for exercise in exercises {
            let table = ThresholdTable::defaults(&exercise);
            let analyzer = analyzer_for(&table, 0.5).unwrap();
            assert_eq!(analyzer.exercise(), &exercise);
        }
    }

    #[test]
    fn test_factory_rejects_inverted_band() {
        let mut table = ThresholdTable::defaults(&ExerciseType::Squat);
        table.set("kneeAngleStart", 140.0).unwrap();
        assert!(analyzer_for(&table, 0.5).is_err());
    }
}
