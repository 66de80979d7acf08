use crate::config::ThresholdTable;
use crate::error::{CoachError, CoachResult};
use crate::models::{ExerciseEvent, ExerciseSession, Feedback, PositionSource};

/// Direction in which the tracked value moves to enter the position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Entered when the value drops under the start threshold (knee bend)
    Below,
    /// Entered when the value rises over the start threshold (arms up)
    Above,
}

/// Start/end thresholds with a dead band between them
///
/// Noise inside the band can neither enter nor leave the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisBand {
    pub start: f32,
    pub end: f32,
    pub crossing: Crossing,
}

impl HysteresisBand {
    pub fn new(start: f32, end: f32, crossing: Crossing) -> CoachResult<Self> {
        let ordered = match crossing {
            Crossing::Below => start < end,
            Crossing::Above => start > end,
        };
        if !ordered {
            return Err(CoachError::InvalidThreshold {
                key: "start/end".to_string(),
                reason: format!(
                    "start {} must be {} end {} to leave a dead band",
                    start,
                    if crossing == Crossing::Below { "below" } else { "above" },
                    end
                ),
            });
        }
        Ok(Self { start, end, crossing })
    }

    pub fn from_table(
        table: &ThresholdTable,
        start_key: &str,
        end_key: &str,
        crossing: Crossing,
    ) -> CoachResult<Self> {
        Self::new(table.get(start_key)?, table.get(end_key)?, crossing).map_err(|_| {
            CoachError::InvalidThreshold {
                key: format!("{}/{}", start_key, end_key),
                reason: format!(
                    "{} must be strictly {} {} for {}",
                    start_key,
                    if crossing == Crossing::Below { "below" } else { "above" },
                    end_key,
                    table.exercise()
                ),
            }
        })
    }

    pub fn passes_start(&self, value: f32) -> bool {
        match self.crossing {
            Crossing::Below => value < self.start,
            Crossing::Above => value > self.start,
        }
    }

    pub fn passes_end(&self, value: f32) -> bool {
        match self.crossing {
            Crossing::Below => value > self.end,
            Crossing::Above => value < self.end,
        }
    }
}

/// Repetition duration cutoffs for pace feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaceLimits {
    pub fast_ms: i64,
    pub slow_ms: i64,
}

impl PaceLimits {
    pub fn from_table(table: &ThresholdTable) -> CoachResult<Self> {
        let fast = table.get("repFastSeconds")?;
        let slow = table.get("repSlowSeconds")?;
        if fast >= slow {
            return Err(CoachError::InvalidThreshold {
                key: "repFastSeconds/repSlowSeconds".to_string(),
                reason: format!("fast cutoff {}s must be below slow cutoff {}s", fast, slow),
            });
        }
        Ok(Self {
            fast_ms: (fast * 1000.0).round() as i64,
            slow_ms: (slow * 1000.0).round() as i64,
        })
    }

    pub fn classify(&self, duration_ms: i64) -> Option<Feedback> {
        if duration_ms < self.fast_ms {
            Some(Feedback::advisory("Too fast, slow down and control the movement"))
        } else if duration_ms > self.slow_ms {
            Some(Feedback::advisory("Too slow, try to keep a steady pace"))
        } else {
            None
        }
    }
}

/// Advance the in/out state machine by one sample
///
/// `entry_feedback` runs only at the instant the position is entered and its
/// result never blocks the transition. A cycle is completed only by the same
/// `source` that entered it; if the other source reports the exit, the cycle
/// is dropped without a repetition.
pub fn advance(
    session: &mut ExerciseSession,
    band: &HysteresisBand,
    pace: Option<&PaceLimits>,
    value: f32,
    source: PositionSource,
    now_ms: i64,
    entry_feedback: impl FnOnce() -> Option<Feedback>,
) -> Vec<ExerciseEvent> {
    if !session.in_position && band.passes_start(value) {
        session.enter_position(now_ms, source);
        let feedback = entry_feedback();
        tracing::debug!(
            "{} entered position at {:.1} (start {:.1}, {:?})",
            session.exercise,
            value,
            band.start,
            source
        );
        return vec![ExerciseEvent::state_changed(
            true,
            session.repetition_count,
            feedback,
        )];
    }

    if session.in_position && band.passes_end(value) {
        let entered_by = session.position_source;
        if entered_by.is_some_and(|entered| entered != source) {
            session.abandon_position();
            tracing::debug!(
                "{} position entered by {:?} left by {:?}, not counted",
                session.exercise,
                entered_by,
                source
            );
            return vec![ExerciseEvent::state_changed(
                false,
                session.repetition_count,
                None,
            )];
        }

        let duration_ms = session.leave_position(now_ms);
        session.repetition_count += 1;
        let feedback = pace.and_then(|p| p.classify(duration_ms));
        tracing::info!(
            "{} repetition {} completed in {} ms",
            session.exercise,
            session.repetition_count,
            duration_ms
        );
        return vec![ExerciseEvent::state_changed(
            false,
            session.repetition_count,
            feedback,
        )];
    }

    Vec::new()
}
