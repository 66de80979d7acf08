/// Joint Angle Engine
///
/// Computes named joint angles from a pose frame:
/// - 2D angle at the central landmark of each joint triple
/// - per-joint confidence from landmark visibility and presence
/// - angular velocity against the previous sample of the same joint
///
/// Velocity memory is per instance. Run separate engines for raw and filtered
/// frames, otherwise one stream's samples become the other's "previous" angle.

use std::collections::HashMap;

use crate::models::{clamp_angle, AngleMap, Joint, JointAngle, Landmark, PoseFrame};

/// Left/right difference above which a pair is reported as asymmetric
pub const ASYMMETRY_THRESHOLD_DEG: f32 = 15.0;
/// Plausible range for the checked joints
pub const MIN_PLAUSIBLE_ANGLE_DEG: f32 = 60.0;
pub const MAX_PLAUSIBLE_ANGLE_DEG: f32 = 175.0;
/// Faster than this is treated as tracking noise
pub const MAX_PLAUSIBLE_VELOCITY_DEG_S: f32 = 300.0;

/// Bilateral pairs compared by `detect_anomalies`
pub const DEFAULT_ANOMALY_PAIRS: &[(Joint, Joint)] = &[(Joint::LeftKnee, Joint::RightKnee)];

#[derive(Debug, Clone, Copy)]
struct AngleSample {
    angle: f32,
    timestamp_ms: i64,
}

pub struct JointAngleEngine {
    min_confidence: f32,
    previous: HashMap<Joint, AngleSample>,
}

impl JointAngleEngine {
    pub fn new(min_confidence: f32) -> Self {
        Self {
            min_confidence: min_confidence.clamp(0.0, 1.0),
            previous: HashMap::new(),
        }
    }

    /// Calculate angle at `central` between the rays to `proximal` and `distal`
    ///
    /// # Returns
    /// Angle in degrees and whether the geometry was usable. A zero-length
    /// ray yields `(0.0, false)`.
    pub fn angle_between(proximal: &Landmark, central: &Landmark, distal: &Landmark) -> (f32, bool) {
        let v1 = (proximal.x - central.x, proximal.y - central.y);
        let v2 = (distal.x - central.x, distal.y - central.y);

        let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
        let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

        if mag1 == 0.0 || mag2 == 0.0 || !mag1.is_finite() || !mag2.is_finite() {
            return (0.0, false);
        }

        let cos_angle = (v1.0 * v2.0 + v1.1 * v2.1) / (mag1 * mag2);
        let angle = cos_angle.clamp(-1.0, 1.0).acos().to_degrees();

        (clamp_angle(angle), true)
    }

    /// Calculate every joint whose three landmarks are reliable
    ///
    /// Joints with an unreliable landmark are left out of the map.
    pub fn calculate(&mut self, frame: &PoseFrame) -> AngleMap {
        let mut angles = AngleMap::new();

        for joint in Joint::ALL {
            let (p, c, d) = joint.landmarks();
            let (Some(proximal), Some(central), Some(distal)) = (
                frame.reliable_landmark(p, self.min_confidence),
                frame.reliable_landmark(c, self.min_confidence),
                frame.reliable_landmark(d, self.min_confidence),
            ) else {
                continue;
            };

            let (angle, is_valid) = Self::angle_between(proximal, central, distal);
            let confidence = [proximal, central, distal]
                .iter()
                .map(|lm| lm.visibility_score() + lm.presence_score())
                .sum::<f32>()
                / 6.0;

            let mut joint_angle = JointAngle::new(joint, angle, confidence);
            joint_angle.is_valid = is_valid;

            if let Some(prev) = self.previous.get(&joint) {
                let elapsed_ms = frame.timestamp_ms.saturating_sub(prev.timestamp_ms);
                if elapsed_ms > 0 {
                    let velocity = (joint_angle.angle_degrees - prev.angle) / (elapsed_ms as f32 / 1000.0);
                    joint_angle = joint_angle.with_velocity(prev.angle, velocity);
                }
            }

            self.previous.insert(
                joint,
                AngleSample {
                    angle: joint_angle.angle_degrees,
                    timestamp_ms: frame.timestamp_ms,
                },
            );
            angles.insert(joint, joint_angle);
        }

        angles
    }

    /// Advisory checks on the default bilateral pairs
    pub fn detect_anomalies(angles: &AngleMap) -> Vec<String> {
        Self::detect_anomalies_for(angles, DEFAULT_ANOMALY_PAIRS)
    }

    /// Advisory checks on the given bilateral pairs
    pub fn detect_anomalies_for(angles: &AngleMap, pairs: &[(Joint, Joint)]) -> Vec<String> {
        let mut anomalies = Vec::new();

        for (left, right) in pairs {
            // Degenerate geometry carries no measurement to judge
            let left_angle = angles.get(left).filter(|a| a.is_valid);
            let right_angle = angles.get(right).filter(|a| a.is_valid);

            if let (Some(l), Some(r)) = (left_angle, right_angle) {
                let diff = (l.angle_degrees - r.angle_degrees).abs();
                if diff > ASYMMETRY_THRESHOLD_DEG {
                    anomalies.push(format!(
                        "Asymmetry between {} and {}: {:.1}° difference",
                        left, right, diff
                    ));
                }
            }

            for angle in [left_angle, right_angle].into_iter().flatten() {
                if angle.angle_degrees < MIN_PLAUSIBLE_ANGLE_DEG
                    || angle.angle_degrees > MAX_PLAUSIBLE_ANGLE_DEG
                {
                    anomalies.push(format!(
                        "Implausible {} angle: {:.1}°",
                        angle.joint, angle.angle_degrees
                    ));
                }
                if let Some(velocity) = angle.angular_velocity {
                    if velocity.abs() > MAX_PLAUSIBLE_VELOCITY_DEG_S {
                        anomalies.push(format!(
                            "Implausibly fast {} motion: {:.0}°/s",
                            angle.joint, velocity
                        ));
                    }
                }
            }
        }

        anomalies
    }

    /// Forget all previous samples
    pub fn reset(&mut self) {
        self.previous.clear();
    }
}

impl Default for JointAngleEngine {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BodyLandmark, LANDMARK_COUNT};

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y, 0.0)
    }

    fn frame_with(ts: i64, points: &[(BodyLandmark, Landmark)]) -> PoseFrame {
        let mut landmarks = vec![lm(0.5, 0.5).with_scores(0.0, 0.0); LANDMARK_COUNT];
        for (point, landmark) in points {
            landmarks[point.index()] = *landmark;
        }
        PoseFrame::new(ts, landmarks)
    }

    #[test]
    fn test_right_angle() {
        let (angle, valid) = JointAngleEngine::angle_between(&lm(0.0, 0.0), &lm(0.0, 1.0), &lm(1.0, 1.0));
        assert!(valid);
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_collinear_is_straight() {
        let (angle, valid) = JointAngleEngine::angle_between(&lm(0.0, 0.0), &lm(0.5, 0.5), &lm(1.0, 1.0));
        assert!(valid);
        assert!((angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_coincident_rays_are_zero() {
        let (angle, valid) = JointAngleEngine::angle_between(&lm(1.0, 0.0), &lm(0.0, 0.0), &lm(2.0, 0.0));
        assert!(valid);
        assert!(angle.abs() < 1e-3);
    }

    #[test]
    fn test_zero_length_segment_is_invalid() {
        let (angle, valid) = JointAngleEngine::angle_between(&lm(0.3, 0.3), &lm(0.3, 0.3), &lm(1.0, 1.0));
        assert!(!valid);
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_low_visibility_joint_is_omitted() {
        let mut engine = JointAngleEngine::default();
        let frame = frame_with(
            0,
            &[
                (BodyLandmark::LeftHip, lm(0.5, 0.4).with_scores(0.9, 0.9)),
                (BodyLandmark::LeftKnee, lm(0.5, 0.6).with_scores(0.9, 0.9)),
                (BodyLandmark::LeftAnkle, lm(0.5, 0.8).with_scores(0.4, 0.9)),
            ],
        );

        let angles = engine.calculate(&frame);
        assert!(!angles.contains_key(&Joint::LeftKnee));
    }

    #[test]
    fn test_confidence_and_velocity() {
        let mut engine = JointAngleEngine::default();
        let straight = frame_with(
            0,
            &[
                (BodyLandmark::LeftHip, lm(0.5, 0.4).with_scores(1.0, 0.8)),
                (BodyLandmark::LeftKnee, lm(0.5, 0.6).with_scores(0.6, 0.6)),
                (BodyLandmark::LeftAnkle, lm(0.5, 0.8).with_scores(1.0, 0.6)),
            ],
        );
        let first = engine.calculate(&straight);
        let knee = &first[&Joint::LeftKnee];
        assert!((knee.angle_degrees - 180.0).abs() < 1e-3);
        assert!((knee.confidence - 0.7667).abs() < 1e-3);
        assert_eq!(knee.angular_velocity, None);

        let bent = frame_with(
            500,
            &[
                (BodyLandmark::LeftHip, lm(0.5, 0.4).with_scores(1.0, 1.0)),
                (BodyLandmark::LeftKnee, lm(0.5, 0.6).with_scores(1.0, 1.0)),
                (BodyLandmark::LeftAnkle, lm(0.7, 0.6).with_scores(1.0, 1.0)),
            ],
        );
        let second = engine.calculate(&bent);
        let knee = &second[&Joint::LeftKnee];
        assert!((knee.angle_degrees - 90.0).abs() < 1e-3);
        assert!((knee.previous_angle.unwrap() - 180.0).abs() < 1e-3);
        // 90° lost over half a second
        assert!((knee.angular_velocity.unwrap() + 180.0).abs() < 0.1);
    }

    #[test]
    fn test_same_timestamp_has_no_velocity() {
        let mut engine = JointAngleEngine::default();
        let frame = frame_with(
            100,
            &[
                (BodyLandmark::LeftHip, lm(0.5, 0.4)),
                (BodyLandmark::LeftKnee, lm(0.5, 0.6)),
                (BodyLandmark::LeftAnkle, lm(0.5, 0.8)),
            ],
        );
        engine.calculate(&frame);
        let angles = engine.calculate(&frame);
        assert_eq!(angles[&Joint::LeftKnee].angular_velocity, None);
    }

    fn knees(left: f32, right: f32) -> AngleMap {
        let mut angles = AngleMap::new();
        angles.insert(Joint::LeftKnee, JointAngle::new(Joint::LeftKnee, left, 1.0));
        angles.insert(Joint::RightKnee, JointAngle::new(Joint::RightKnee, right, 1.0));
        angles
    }

    #[test]
    fn test_asymmetry_boundary() {
        let at_boundary = JointAngleEngine::detect_anomalies(&knees(100.0, 115.0));
        assert!(at_boundary.is_empty(), "{:?}", at_boundary);

        let over = JointAngleEngine::detect_anomalies(&knees(100.0, 115.1));
        assert_eq!(over.len(), 1);
        assert!(over[0].starts_with("Asymmetry"));
    }

    #[test]
    fn test_implausible_angle_and_velocity() {
        let mut angles = knees(176.0, 120.0);
        angles.insert(
            Joint::RightKnee,
            JointAngle::new(Joint::RightKnee, 120.0, 1.0).with_velocity(10.0, 350.0),
        );

        let anomalies = JointAngleEngine::detect_anomalies(&angles);
        assert!(anomalies.iter().any(|a| a.starts_with("Asymmetry")));
        assert!(anomalies.iter().any(|a| a.contains("Implausible left_knee angle")));
        assert!(anomalies.iter().any(|a| a.contains("fast right_knee")));
    }

    #[test]
    fn test_degenerate_angles_are_not_flagged() {
        let mut angles = knees(120.0, 120.0);
        for joint in [Joint::LeftKnee, Joint::RightKnee] {
            let mut degenerate = JointAngle::new(joint, 0.0, 1.0).with_velocity(120.0, -900.0);
            degenerate.is_valid = false;
            angles.insert(joint, degenerate);
        }
        assert!(JointAngleEngine::detect_anomalies(&angles).is_empty());

        // One degenerate side leaves nothing to compare against
        angles.insert(Joint::LeftKnee, JointAngle::new(Joint::LeftKnee, 120.0, 1.0));
        assert!(JointAngleEngine::detect_anomalies(&angles).is_empty());
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let mut engine = JointAngleEngine::default();
        let points = [
            (BodyLandmark::LeftHip, lm(0.5, 0.4)),
            (BodyLandmark::LeftKnee, lm(0.5, 0.6)),
            (BodyLandmark::LeftAnkle, lm(0.5, 0.8)),
        ];
        engine.calculate(&frame_with(i64::MIN, &points));
        let angles = engine.calculate(&frame_with(i64::MAX, &points));
        assert_eq!(angles[&Joint::LeftKnee].angular_velocity, Some(0.0));
    }

    #[test]
    fn test_missing_side_skips_asymmetry() {
        let mut angles = AngleMap::new();
        angles.insert(Joint::LeftKnee, JointAngle::new(Joint::LeftKnee, 120.0, 1.0));
        assert!(JointAngleEngine::detect_anomalies(&angles).is_empty());
    }
}
