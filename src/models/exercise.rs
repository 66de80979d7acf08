use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoachError;

/// Exercise types supported by the repetition tracker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExerciseType {
    Squat,
    PushUp,
    Lunge,
    Plank,
    JumpingJack,
    /// Any exercise without a geometric model; counted by the coordinate heuristic
    Custom(String),
}

impl ExerciseType {
    /// Exercises with a dedicated analyzer
    pub const NAMED: [ExerciseType; 5] = [
        ExerciseType::Squat,
        ExerciseType::PushUp,
        ExerciseType::Lunge,
        ExerciseType::Plank,
        ExerciseType::JumpingJack,
    ];

    /// Whether the exercise is scored by holding a position rather than counting crossings
    pub fn is_hold(&self) -> bool {
        matches!(self, ExerciseType::Plank)
    }

    /// Key used for per-exercise configuration tables
    pub fn config_key(&self) -> &str {
        match self {
            ExerciseType::Squat => "squat",
            ExerciseType::PushUp => "push-up",
            ExerciseType::Lunge => "lunge",
            ExerciseType::Plank => "plank",
            ExerciseType::JumpingJack => "jumping-jack",
            ExerciseType::Custom(_) => "custom",
        }
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseType::Custom(name) => write!(f, "custom:{}", name),
            other => write!(f, "{}", other.config_key()),
        }
    }
}

impl FromStr for ExerciseType {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        let exercise = match normalized.as_str() {
            "" => return Err(CoachError::EmptyExerciseName),
            "squat" | "squats" => ExerciseType::Squat,
            "push-up" | "pushup" | "push-ups" | "pushups" => ExerciseType::PushUp,
            "lunge" | "lunges" => ExerciseType::Lunge,
            "plank" => ExerciseType::Plank,
            "jumping-jack" | "jumpingjack" | "jumping-jacks" => ExerciseType::JumpingJack,
            _ => {
                let name = s.trim();
                let name = name.strip_prefix("custom:").unwrap_or(name).trim();
                if name.is_empty() {
                    return Err(CoachError::EmptyExerciseName);
                }
                ExerciseType::Custom(name.to_string())
            }
        };
        Ok(exercise)
    }
}

impl TryFrom<String> for ExerciseType {
    type Error = CoachError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExerciseType> for String {
    fn from(value: ExerciseType) -> Self {
        value.to_string()
    }
}
