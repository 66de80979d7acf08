use thiserror::Error;

/// Errors raised while configuring a tracking session or decoding input.
///
/// Per-frame problems (malformed frames, low-confidence joints, missing
/// subject) never surface here; they are reported as events instead.
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Exercise name must not be empty")]
    EmptyExerciseName,

    #[error("Unknown threshold '{key}' for exercise {exercise}")]
    UnknownThreshold { exercise: String, key: String },

    #[error("Missing threshold '{key}' for exercise {exercise}")]
    MissingThreshold { exercise: String, key: String },

    #[error("Invalid threshold '{key}': {reason}")]
    InvalidThreshold { key: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to decode pose frame: {0}")]
    FrameDecode(#[from] serde_json::Error),
}

pub type CoachResult<T> = Result<T, CoachError>;
