/// One-dimensional Kalman estimator for a single noisy scalar
///
/// Constant-position model: each update blends the prior estimate with the
/// new measurement using a gain derived from the error covariance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSmoother {
    /// Current estimate
    x: f32,
    /// Estimation error covariance
    p: f32,
    /// Process noise
    q: f32,
    /// Measurement noise
    r: f32,
}

impl ScalarSmoother {
    pub fn new(initial_value: f32, process_noise: f32, measurement_noise: f32) -> Self {
        Self {
            x: initial_value,
            p: 1.0,
            q: process_noise.max(0.0),
            r: measurement_noise.max(0.0),
        }
    }

    pub fn update(&mut self, measurement: f32) -> f32 {
        // Prediction step
        let p_pred = self.p + self.q;

        // Update step; with p_pred and r both zero there is nothing to blend
        let denominator = p_pred + self.r;
        let k = if denominator > 0.0 { p_pred / denominator } else { 1.0 };
        self.x += k * (measurement - self.x);
        self.p = (1.0 - k) * p_pred;

        self.x
    }

    pub fn reset(&mut self, initial_value: f32) {
        self.x = initial_value;
        self.p = 1.0;
    }

    pub fn estimate(&self) -> f32 {
        self.x
    }

    pub fn covariance(&self) -> f32 {
        self.p
    }
}
