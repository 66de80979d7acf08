/// Landmark Filter
///
/// Denoises whole pose frames by running one scalar Kalman smoother per axis
/// (x, y, z) per landmark. The smoother bank is explicit state:
/// - absent until the first frame is seen
/// - rebuilt, seeded with the incoming raw values, whenever the landmark
///   count differs from the bank size
///
/// Visibility and presence scores are passed through untouched.

use crate::config::SmoothingConfig;
use crate::models::{Landmark, PoseFrame};

use super::scalar_smoother::ScalarSmoother;

/// Smoothers for the three axes of one landmark
#[derive(Debug, Clone)]
struct AxisSmoothers {
    x: ScalarSmoother,
    y: ScalarSmoother,
    z: ScalarSmoother,
}

impl AxisSmoothers {
    fn seeded(landmark: &Landmark, config: &SmoothingConfig) -> Self {
        let smoother = |value| ScalarSmoother::new(value, config.process_noise, config.measurement_noise);
        Self {
            x: smoother(landmark.x),
            y: smoother(landmark.y),
            z: smoother(landmark.z),
        }
    }

    fn update(&mut self, landmark: &Landmark) -> Landmark {
        Landmark {
            x: self.x.update(landmark.x),
            y: self.y.update(landmark.y),
            z: self.z.update(landmark.z),
            ..*landmark
        }
    }
}

pub struct LandmarkFilter {
    config: SmoothingConfig,
    bank: Option<Vec<AxisSmoothers>>,
}

impl LandmarkFilter {
    pub fn new(config: SmoothingConfig) -> Self {
        Self { config, bank: None }
    }

    pub fn config(&self) -> SmoothingConfig {
        self.config
    }

    /// Whether a smoother bank currently exists
    pub fn is_initialized(&self) -> bool {
        self.bank.is_some()
    }

    /// Number of landmarks the current bank tracks
    pub fn tracked_landmarks(&self) -> usize {
        self.bank.as_ref().map_or(0, Vec::len)
    }

    /// Filter a frame, returning a frame of identical cardinality
    pub fn process(&mut self, frame: &PoseFrame) -> PoseFrame {
        let needs_init = self
            .bank
            .as_ref()
            .map_or(true, |bank| bank.len() != frame.landmarks.len());

        if needs_init {
            tracing::debug!(
                "Initializing landmark filter bank for {} landmarks",
                frame.landmarks.len()
            );
            self.bank = Some(
                frame
                    .landmarks
                    .iter()
                    .map(|lm| AxisSmoothers::seeded(lm, &self.config))
                    .collect(),
            );
        }

        let landmarks = match self.bank.as_mut() {
            Some(bank) => bank
                .iter_mut()
                .zip(frame.landmarks.iter())
                .map(|(smoothers, lm)| smoothers.update(lm))
                .collect(),
            None => frame.landmarks.clone(),
        };

        PoseFrame::new(frame.timestamp_ms, landmarks)
    }

    /// Drop the smoother bank; the next frame re-seeds it
    pub fn reset(&mut self) {
        self.bank = None;
    }

    /// Swap noise parameters, discarding state tuned for the old ones
    pub fn reconfigure(&mut self, config: SmoothingConfig) {
        self.config = config;
        self.reset();
    }
}
