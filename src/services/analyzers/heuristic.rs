use crate::config::ThresholdTable;
use crate::error::CoachResult;
use crate::models::{BodyLandmark, ExerciseEvent, ExerciseSession, PoseFrame, PositionSource};

use super::crossing::{self, Crossing, HysteresisBand, PaceLimits};

const HIPS: [BodyLandmark; 2] = [BodyLandmark::LeftHip, BodyLandmark::RightHip];
const ANKLES: [BodyLandmark; 2] = [BodyLandmark::LeftAnkle, BodyLandmark::RightAnkle];

/// Coordinate-proximity fallback
///
/// Tracks the vertical gap between the hips and the ankles (ankle y minus hip
/// y in normalized image units). The position is entered when the gap shrinks
/// under `hipAnkleEnterMargin` and left when it grows past
/// `hipAnkleExitMargin`. No joint angles are involved, so it keeps counting
/// when knees or elbows are occluded, at reduced precision.
#[derive(Debug, Clone, Copy)]
pub struct ProximityHeuristic {
    band: HysteresisBand,
    min_confidence: f32,
}

impl ProximityHeuristic {
    pub fn from_table(table: &ThresholdTable, min_confidence: f32) -> CoachResult<Self> {
        Ok(Self {
            band: HysteresisBand::from_table(
                table,
                "hipAnkleEnterMargin",
                "hipAnkleExitMargin",
                Crossing::Below,
            )?,
            min_confidence,
        })
    }

    /// Hip-to-ankle vertical gap, or None when either group is unreliable
    pub fn measure(&self, frame: &PoseFrame) -> Option<f32> {
        let hip_y = frame.mean_y(&HIPS, self.min_confidence)?;
        let ankle_y = frame.mean_y(&ANKLES, self.min_confidence)?;
        Some(ankle_y - hip_y)
    }

    /// Whether the gap currently counts as "in position", honouring the dead band
    pub fn holds(&self, gap: f32, currently_in: bool) -> bool {
        if currently_in {
            !self.band.passes_end(gap)
        } else {
            self.band.passes_start(gap)
        }
    }

    /// Run one frame through the in/out state machine on the gap alone
    pub fn advance(
        &self,
        session: &mut ExerciseSession,
        frame: &PoseFrame,
        pace: Option<&PaceLimits>,
        now_ms: i64,
    ) -> Vec<ExerciseEvent> {
        match self.measure(frame) {
            Some(gap) => crossing::advance(session, &self.band, pace, gap, PositionSource::Heuristic, now_ms, || None),
            None => {
                tracing::trace!("Heuristic landmarks unreliable, skipping frame");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseType;
    use crate::services::analyzers::test_support::{crouched_frame, standing_frame};

    fn heuristic() -> ProximityHeuristic {
        let table = ThresholdTable::defaults(&ExerciseType::Custom("burpee".to_string()));
        ProximityHeuristic::from_table(&table, 0.5).unwrap()
    }

    #[test]
    fn test_measure_gap() {
        let h = heuristic();
        assert!((h.measure(&standing_frame(0)).unwrap() - 0.4).abs() < 1e-5);
        assert!((h.measure(&crouched_frame(0)).unwrap() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_counts_on_gap() {
        let h = heuristic();
        let mut session = ExerciseSession::new(ExerciseType::Custom("burpee".to_string()));

        h.advance(&mut session, &standing_frame(0), None, 0);
        h.advance(&mut session, &crouched_frame(500), None, 500);
        assert!(session.in_position);
        h.advance(&mut session, &standing_frame(1_200), None, 1_200);
        assert!(!session.in_position);
        assert_eq!(session.repetition_count, 1);
    }

    #[test]
    fn test_unreliable_landmarks_are_noop() {
        let h = heuristic();
        let mut frame = crouched_frame(0);
        for point in ANKLES {
            frame.landmarks[point.index()] = frame.landmarks[point.index()].with_scores(0.1, 0.1);
        }
        let mut session = ExerciseSession::new(ExerciseType::Custom("burpee".to_string()));
        assert!(h.advance(&mut session, &frame, None, 0).is_empty());
        assert!(!session.in_position);
    }

    #[test]
    fn test_holds_respects_dead_band() {
        let h = heuristic();
        assert!(!h.holds(0.27, false));
        assert!(h.holds(0.27, true));
        assert!(!h.holds(0.31, true));
    }
}
