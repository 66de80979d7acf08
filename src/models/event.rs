use serde::{Deserialize, Serialize};

/// Technique or pace feedback attached to a state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub is_critical: bool,
}

impl Feedback {
    pub fn advisory(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_critical: false,
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_critical: true,
        }
    }
}

/// Why a frame was rejected before processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityIssue {
    WrongLandmarkCount { expected: usize, actual: usize },
}

impl std::fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataQualityIssue::WrongLandmarkCount { expected, actual } => {
                write!(f, "expected {} landmarks, got {}", expected, actual)
            }
        }
    }
}

/// Everything the pipeline reports back to its host for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExerciseEvent {
    StateChanged {
        in_position: bool,
        repetition_count: u32,
        feedback: Option<Feedback>,
    },
    HoldProgressUpdated {
        elapsed_seconds: u32,
    },
    SessionReset,
    DataQuality {
        issue: DataQualityIssue,
    },
    AnomalyDetected {
        messages: Vec<String>,
    },
}

impl ExerciseEvent {
    pub fn state_changed(in_position: bool, repetition_count: u32, feedback: Option<Feedback>) -> Self {
        ExerciseEvent::StateChanged {
            in_position,
            repetition_count,
            feedback,
        }
    }
}
