/// Pose Pipeline
///
/// Single entry point for a tracking session. Each call to `process`:
/// - validates the frame shape (malformed frames are reported, not processed)
/// - tracks subject absence and resets the session after a timeout
/// - clamps non-increasing timestamps
/// - filters landmarks, computes raw and filtered angles
/// - hands the selected angles and the raw frame to the exercise analyzer
///
/// Calls must not overlap; `&mut self` makes the pipeline single-writer.

use std::borrow::Cow;

use crate::config::{PipelineConfig, SmoothingConfig, ThresholdTable};
use crate::error::CoachResult;
use crate::models::{
    AngleMap, DataQualityIssue, ExerciseEvent, ExerciseSession, ExerciseType, FrameShape, PoseFrame,
    WorkoutSummary, LANDMARK_COUNT,
};

use super::analyzers::{analyzer_for, ExerciseAnalyzer};
use super::joint_angle_engine::JointAngleEngine;
use super::landmark_filter::LandmarkFilter;

pub struct PosePipeline {
    config: PipelineConfig,
    thresholds: ThresholdTable,
    analyzer: Box<dyn ExerciseAnalyzer>,
    filter: LandmarkFilter,
    raw_engine: JointAngleEngine,
    filtered_engine: JointAngleEngine,
    session: ExerciseSession,
    last_timestamp_ms: Option<i64>,
    /// Angles handed to the analyzer for the latest subject frame
    last_angles: AngleMap,
}

impl PosePipeline {
    /// Create a pipeline with the exercise's default thresholds
    pub fn new(exercise: ExerciseType, config: PipelineConfig) -> CoachResult<Self> {
        Self::with_thresholds(ThresholdTable::defaults(&exercise), config)
    }

    /// Create a pipeline with an explicit threshold table
    pub fn with_thresholds(thresholds: ThresholdTable, config: PipelineConfig) -> CoachResult<Self> {
        config.validate()?;
        let analyzer = analyzer_for(&thresholds, config.min_landmark_confidence)?;
        let exercise = thresholds.exercise().clone();

        tracing::info!("Starting {} session", exercise);

        Ok(Self {
            filter: LandmarkFilter::new(SmoothingConfig::for_exercise(&exercise)),
            raw_engine: JointAngleEngine::new(config.min_landmark_confidence),
            filtered_engine: JointAngleEngine::new(config.min_landmark_confidence),
            session: ExerciseSession::new(exercise),
            config,
            thresholds,
            analyzer,
            last_timestamp_ms: None,
            last_angles: AngleMap::new(),
        })
    }

    pub fn session(&self) -> &ExerciseSession {
        &self.session
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn filter(&self) -> &LandmarkFilter {
        &self.filter
    }

    /// Joint angles the analyzer saw on the latest subject frame
    pub fn last_angles(&self) -> &AngleMap {
        &self.last_angles
    }

    /// Process one frame and return the events it produced
    pub fn process(&mut self, frame: &PoseFrame) -> Vec<ExerciseEvent> {
        match frame.shape() {
            FrameShape::Malformed { landmark_count } => {
                tracing::warn!(
                    "Rejecting frame at {} ms with {} landmarks",
                    frame.timestamp_ms,
                    landmark_count
                );
                vec![ExerciseEvent::DataQuality {
                    issue: DataQualityIssue::WrongLandmarkCount {
                        expected: LANDMARK_COUNT,
                        actual: landmark_count,
                    },
                }]
            }
            FrameShape::NoSubject => {
                self.clamp_timestamp(frame.timestamp_ms);
                self.subject_missing()
            }
            FrameShape::Complete => self.process_subject(frame),
        }
    }

    fn subject_missing(&mut self) -> Vec<ExerciseEvent> {
        let missing = self.session.frames_without_subject.saturating_add(1);
        self.session.frames_without_subject = missing;

        if missing != self.config.reset_delay_frames {
            return Vec::new();
        }

        tracing::warn!(
            "No subject for {} frames, resetting {} session ({} repetitions discarded)",
            missing,
            self.session.exercise,
            self.session.repetition_count
        );
        self.clear_tracking_state();
        // Keep counting so a continued absence does not reset again
        self.session.frames_without_subject = missing;

        vec![
            ExerciseEvent::SessionReset,
            ExerciseEvent::state_changed(false, 0, None),
        ]
    }

    fn process_subject(&mut self, frame: &PoseFrame) -> Vec<ExerciseEvent> {
        self.session.frames_without_subject = 0;

        let now_ms = self.clamp_timestamp(frame.timestamp_ms);
        let frame = if now_ms == frame.timestamp_ms {
            Cow::Borrowed(frame)
        } else {
            Cow::Owned(PoseFrame::new(now_ms, frame.landmarks.clone()))
        };
        self.session.observe_frame(now_ms);

        let filtered = self.filter.process(&frame);
        let raw_angles = self.raw_engine.calculate(&frame);
        let filtered_angles = self.filtered_engine.calculate(&filtered);
        let angles = if self.config.use_filtered_angles {
            filtered_angles
        } else {
            raw_angles
        };

        let mut events = Vec::new();
        if self.config.detect_anomalies {
            let messages = JointAngleEngine::detect_anomalies(&angles);
            if !messages.is_empty() {
                tracing::debug!("Anomalies at {} ms: {:?}", now_ms, messages);
                events.push(ExerciseEvent::AnomalyDetected { messages });
            }
        }

        events.extend(
            self.analyzer
                .analyze(&mut self.session, &angles, &frame, now_ms),
        );
        self.last_angles = angles;
        events
    }

    /// Enforce strictly increasing frame times
    fn clamp_timestamp(&mut self, timestamp_ms: i64) -> i64 {
        let clamped = match self.last_timestamp_ms {
            Some(previous) if timestamp_ms <= previous => {
                let adjusted = previous.saturating_add(self.config.timestamp_epsilon_ms);
                tracing::debug!(
                    "Non-increasing timestamp {} ms after {} ms, using {} ms",
                    timestamp_ms,
                    previous,
                    adjusted
                );
                adjusted
            }
            _ => timestamp_ms,
        };
        self.last_timestamp_ms = Some(clamped);
        clamped
    }

    fn clear_tracking_state(&mut self) {
        self.session.reset();
        self.last_angles.clear();
        self.filter.reset();
        self.raw_engine.reset();
        self.filtered_engine.reset();
    }

    /// Abort the workout: clear session, filter and velocity memory
    pub fn reset(&mut self) -> Vec<ExerciseEvent> {
        tracing::info!("Resetting {} session on request", self.session.exercise);
        self.clear_tracking_state();
        self.last_timestamp_ms = None;
        vec![
            ExerciseEvent::SessionReset,
            ExerciseEvent::state_changed(false, 0, None),
        ]
    }

    /// Replace the active exercise and its thresholds
    ///
    /// The new analyzer is built before anything is discarded, so an invalid
    /// table leaves the running session untouched.
    pub fn switch_exercise(&mut self, thresholds: ThresholdTable) -> CoachResult<Vec<ExerciseEvent>> {
        let analyzer = analyzer_for(&thresholds, self.config.min_landmark_confidence)?;
        let exercise = thresholds.exercise().clone();

        tracing::info!("Switching from {} to {}", self.session.exercise, exercise);

        self.analyzer = analyzer;
        self.thresholds = thresholds;
        self.filter
            .reconfigure(SmoothingConfig::for_exercise(&exercise));
        self.raw_engine.reset();
        self.filtered_engine.reset();
        self.last_angles.clear();
        self.session = ExerciseSession::new(exercise);
        self.last_timestamp_ms = None;

        Ok(vec![
            ExerciseEvent::SessionReset,
            ExerciseEvent::state_changed(false, 0, None),
        ])
    }

    /// Snapshot of the session as a finished-workout record
    pub fn summary(&self) -> WorkoutSummary {
        WorkoutSummary::from_session(&self.session)
    }

    /// End the workout and hand back its record
    pub fn finish(self) -> WorkoutSummary {
        let summary = self.summary();
        tracing::info!(
            "Finished {} session with {} repetitions",
            summary.exercise,
            summary.repetition_count
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Landmark;

    #[test]
    fn test_timestamp_clamp() {
        let mut pipeline = PosePipeline::new(ExerciseType::Squat, PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.clamp_timestamp(100), 100);
        assert_eq!(pipeline.clamp_timestamp(100), 101);
        assert_eq!(pipeline.clamp_timestamp(50), 102);
        assert_eq!(pipeline.clamp_timestamp(200), 200);
    }

    #[test]
    fn test_timestamp_clamp_saturates() {
        let mut pipeline = PosePipeline::new(ExerciseType::Squat, PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.clamp_timestamp(i64::MAX), i64::MAX);
        assert_eq!(pipeline.clamp_timestamp(0), i64::MAX);
    }

    #[test]
    fn test_malformed_frame_leaves_state_untouched() {
        let mut pipeline = PosePipeline::new(ExerciseType::Squat, PipelineConfig::default()).unwrap();
        let before = pipeline.session().clone();

        let frame = PoseFrame::new(0, vec![Landmark::new(0.5, 0.5, 0.0); 17]);
        let events = pipeline.process(&frame);

        assert_eq!(
            events,
            vec![ExerciseEvent::DataQuality {
                issue: DataQualityIssue::WrongLandmarkCount {
                    expected: 33,
                    actual: 17
                }
            }]
        );
        assert_eq!(pipeline.session(), &before);
        assert!(!pipeline.filter.is_initialized());
        assert_eq!(pipeline.last_timestamp_ms, None);
    }

    #[test]
    fn test_invalid_switch_keeps_session() {
        let mut pipeline = PosePipeline::new(ExerciseType::Squat, PipelineConfig::default()).unwrap();
        let id = pipeline.session().id;

        let mut table = ThresholdTable::defaults(&ExerciseType::PushUp);
        table.set("elbowAngleStart", 150.0).unwrap();

        assert!(pipeline.switch_exercise(table).is_err());
        assert_eq!(pipeline.session().id, id);
        assert_eq!(pipeline.session().exercise, ExerciseType::Squat);
    }
}
