use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoachError, CoachResult};
use crate::models::ExerciseType;

// Angles in degrees, durations in seconds, ratios and margins in normalized units.

const SQUAT_DEFAULTS: &[(&str, f32)] = &[
    ("kneeAngleStart", 120.0),
    ("kneeAngleEnd", 130.0),
    ("hipAngleMin", 50.0),
    ("stanceWidthRatioMin", 0.8),
    ("repFastSeconds", 1.0),
    ("repSlowSeconds", 5.0),
];

const PUSH_UP_DEFAULTS: &[(&str, f32)] = &[
    ("elbowAngleStart", 90.0),
    ("elbowAngleEnd", 110.0),
    ("bodyLineMin", 150.0),
    ("repFastSeconds", 0.8),
    ("repSlowSeconds", 4.0),
];

const LUNGE_DEFAULTS: &[(&str, f32)] = &[
    ("kneeAngleStart", 100.0),
    ("kneeAngleEnd", 115.0),
    ("backKneeMax", 130.0),
    ("repFastSeconds", 1.0),
    ("repSlowSeconds", 6.0),
];

const JUMPING_JACK_DEFAULTS: &[(&str, f32)] = &[
    ("armAngleStart", 140.0),
    ("armAngleEnd", 120.0),
    ("stanceWidthRatioMin", 1.5),
    ("repFastSeconds", 0.3),
    ("repSlowSeconds", 2.0),
];

const PLANK_DEFAULTS: &[(&str, f32)] = &[
    ("bodyLineMin", 160.0),
    ("elbowAngleTarget", 90.0),
    ("elbowAngleTolerance", 20.0),
    ("minHoldSeconds", 30.0),
    ("progressIntervalSeconds", 5.0),
];

/// Margins of the hip/ankle proximity heuristic, shared by every exercise
/// because any of them may fall back to it when joint angles are missing.
const HEURISTIC_DEFAULTS: &[(&str, f32)] = &[
    ("hipAnkleEnterMargin", 0.25),
    ("hipAnkleExitMargin", 0.30),
];

/// Named threshold parameters for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    exercise: ExerciseType,
    values: BTreeMap<String, f32>,
}

impl ThresholdTable {
    /// Built-in table for an exercise
    pub fn defaults(exercise: &ExerciseType) -> Self {
        let specific: &[(&str, f32)] = match exercise {
            ExerciseType::Squat => SQUAT_DEFAULTS,
            ExerciseType::PushUp => PUSH_UP_DEFAULTS,
            ExerciseType::Lunge => LUNGE_DEFAULTS,
            ExerciseType::JumpingJack => JUMPING_JACK_DEFAULTS,
            ExerciseType::Plank => PLANK_DEFAULTS,
            ExerciseType::Custom(_) => &[],
        };

        let values = specific
            .iter()
            .chain(HEURISTIC_DEFAULTS.iter())
            .map(|(key, value)| (key.to_string(), *value))
            .collect();

        Self {
            exercise: exercise.clone(),
            values,
        }
    }

    /// Defaults with caller-supplied values layered on top
    ///
    /// Only keys the exercise knows are accepted, so a typo fails loudly
    /// instead of silently leaving the default in place.
    pub fn with_overrides(
        exercise: &ExerciseType,
        overrides: &BTreeMap<String, f32>,
    ) -> CoachResult<Self> {
        let mut table = Self::defaults(exercise);
        for (key, value) in overrides {
            table.set(key, *value)?;
        }
        Ok(table)
    }

    pub fn set(&mut self, key: &str, value: f32) -> CoachResult<()> {
        if !self.values.contains_key(key) {
            return Err(CoachError::UnknownThreshold {
                exercise: self.exercise.to_string(),
                key: key.to_string(),
            });
        }
        if !value.is_finite() || value < 0.0 {
            return Err(CoachError::InvalidThreshold {
                key: key.to_string(),
                reason: format!("expected a finite non-negative number, got {}", value),
            });
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> CoachResult<f32> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| CoachError::MissingThreshold {
                exercise: self.exercise.to_string(),
                key: key.to_string(),
            })
    }

    pub fn exercise(&self) -> &ExerciseType {
        &self.exercise
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
