use crate::config::ThresholdTable;
use crate::error::{CoachError, CoachResult};
use crate::models::{
    mean_angle, AngleMap, ExerciseEvent, ExerciseSession, ExerciseType, Feedback, Joint, PoseFrame,
    PositionSource,
};

use super::heuristic::ProximityHeuristic;
use super::ExerciseAnalyzer;

/// Result of checking the hold criteria on one frame
#[derive(Debug, Clone, PartialEq)]
enum FormCheck {
    /// Criteria met, judged from the given source
    Held(PositionSource),
    Broken(Feedback),
    /// Neither angles nor heuristic landmarks were usable
    Unknown,
}

/// Plank: a hold scored on continuous time in good form
pub struct PlankAnalyzer {
    exercise: ExerciseType,
    body_line_min: f32,
    elbow_target: f32,
    elbow_tolerance: f32,
    min_hold_ms: i64,
    progress_interval_secs: u32,
    fallback: ProximityHeuristic,
}

impl PlankAnalyzer {
    pub fn from_table(table: &ThresholdTable, min_confidence: f32) -> CoachResult<Self> {
        let progress_interval = table.get("progressIntervalSeconds")?.round();
        if progress_interval < 1.0 {
            return Err(CoachError::InvalidThreshold {
                key: "progressIntervalSeconds".to_string(),
                reason: "must be at least one second".to_string(),
            });
        }

        Ok(Self {
            exercise: ExerciseType::Plank,
            body_line_min: table.get("bodyLineMin")?,
            elbow_target: table.get("elbowAngleTarget")?,
            elbow_tolerance: table.get("elbowAngleTolerance")?,
            min_hold_ms: (table.get("minHoldSeconds")? * 1000.0).round() as i64,
            progress_interval_secs: progress_interval as u32,
            fallback: ProximityHeuristic::from_table(table, min_confidence)?,
        })
    }

    fn check_form(&self, session: &ExerciseSession, angles: &AngleMap, frame: &PoseFrame) -> FormCheck {
        let body = mean_angle(angles, &[Joint::LeftBodyLine, Joint::RightBodyLine]);
        let elbow = mean_angle(angles, &[Joint::LeftElbow, Joint::RightElbow]);

        match (body, elbow) {
            (Some(body), Some(elbow)) => {
                if body < self.body_line_min {
                    FormCheck::Broken(Feedback::advisory("Keep your hips in line with your shoulders"))
                } else if (elbow - self.elbow_target).abs() > self.elbow_tolerance {
                    FormCheck::Broken(Feedback::advisory("Keep your elbows under your shoulders"))
                } else {
                    FormCheck::Held(PositionSource::Angles)
                }
            }
            _ => match self.fallback.measure(frame) {
                Some(gap) if self.fallback.holds(gap, session.in_position) => {
                    FormCheck::Held(PositionSource::Heuristic)
                }
                Some(_) => FormCheck::Broken(Feedback::advisory("Lower your hips back into the plank")),
                None => FormCheck::Unknown,
            },
        }
    }

    fn track_hold(&self, session: &mut ExerciseSession, now_ms: i64) -> Vec<ExerciseEvent> {
        let mut events = Vec::new();
        let elapsed_ms = session.elapsed_in_position_ms(now_ms).unwrap_or(0);
        let elapsed_secs = (elapsed_ms / 1000) as u32;

        let bucket = elapsed_secs / self.progress_interval_secs;
        if bucket > 0 && session.hold.last_reported_bucket != Some(bucket) {
            session.hold.last_reported_bucket = Some(bucket);
            events.push(ExerciseEvent::HoldProgressUpdated {
                elapsed_seconds: elapsed_secs,
            });
        }

        if !session.hold.completed && elapsed_ms >= self.min_hold_ms {
            session.hold.completed = true;
            session.repetition_count += 1;
            tracing::info!("{} target hold reached after {} ms", session.exercise, elapsed_ms);
            events.push(ExerciseEvent::state_changed(
                true,
                session.repetition_count,
                Some(Feedback::advisory("Target hold time reached, great work")),
            ));
        }

        events
    }
}

impl ExerciseAnalyzer for PlankAnalyzer {
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
        match (self.check_form(session, angles, frame), session.in_position) {
            (FormCheck::Held(source), false) => {
                session.enter_position(now_ms, source);
                session.hold.last_reported_bucket = None;
                tracing::debug!("Plank hold started at {} ms", now_ms);
                vec![ExerciseEvent::state_changed(true, session.repetition_count, None)]
            }
            (FormCheck::Held(_), true) => self.track_hold(session, now_ms),
            (FormCheck::Broken(feedback), true) => {
                let held_ms = session.leave_position(now_ms);
                tracing::debug!("Plank hold ended after {} ms: {}", held_ms, feedback.message);
                vec![ExerciseEvent::state_changed(
                    false,
                    session.repetition_count,
                    Some(feedback),
                )]
            }
            (FormCheck::Broken(_), false) | (FormCheck::Unknown, _) => Vec::new(),
        }
    }
}
