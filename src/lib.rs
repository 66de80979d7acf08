//! Repetition counting from pose landmarks
//!
//! Frames of 33 body landmarks go in, exercise events come out. The
//! [`PosePipeline`] smooths landmarks, derives joint angles and drives a
//! per-exercise state machine that counts repetitions, times holds and
//! produces form feedback.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::{PipelineConfig, SmoothingConfig, ThresholdTable};
pub use error::{CoachError, CoachResult};
pub use models::{ExerciseEvent, ExerciseSession, ExerciseType, PoseFrame, WorkoutSummary};
pub use services::PosePipeline;
