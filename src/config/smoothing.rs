use serde::{Deserialize, Serialize};

use crate::models::ExerciseType;

/// Noise parameters for the per-coordinate landmark smoothers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Kalman process noise
    pub process_noise: f32,
    /// Kalman measurement noise
    pub measurement_noise: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            process_noise: 0.01,
            measurement_noise: 0.1,
        }
    }
}

impl SmoothingConfig {
    pub fn new(process_noise: f32, measurement_noise: f32) -> Self {
        Self {
            process_noise,
            measurement_noise,
        }
    }

    /// Parameters tuned per exercise; unlisted exercises get the default pair
    pub fn for_exercise(exercise: &ExerciseType) -> Self {
        match exercise {
            ExerciseType::Squat | ExerciseType::Lunge => Self::new(0.01, 0.1),
            ExerciseType::PushUp => Self::new(0.008, 0.12),
            // Static hold, jitter matters more than lag
            ExerciseType::Plank => Self::new(0.005, 0.2),
            // Fast limb swings, lag would swallow the arm peak
            ExerciseType::JumpingJack => Self::new(0.05, 0.05),
            ExerciseType::Custom(_) => Self::default(),
        }
    }
}
