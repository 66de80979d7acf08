use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::landmark::BodyLandmark;

/// Joints the angle engine measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    LeftKnee,
    RightKnee,
    LeftHip,
    RightHip,
    LeftElbow,
    RightElbow,
    LeftShoulder,
    RightShoulder,
    /// Shoulder-hip-ankle line, used for back straightness
    LeftBodyLine,
    RightBodyLine,
}

impl Joint {
    pub const ALL: [Joint; 10] = [
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftBodyLine,
        Joint::RightBodyLine,
    ];

    /// Get joint name
    pub fn name(&self) -> &'static str {
        match self {
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftBodyLine => "left_body_line",
            Self::RightBodyLine => "right_body_line",
        }
    }

    /// Landmark triple (proximal, central, distal); the angle sits at the central point
    pub fn landmarks(&self) -> (BodyLandmark, BodyLandmark, BodyLandmark) {
        use BodyLandmark::*;
        match self {
            Self::LeftKnee => (LeftHip, LeftKnee, LeftAnkle),
            Self::RightKnee => (RightHip, RightKnee, RightAnkle),
            Self::LeftHip => (LeftShoulder, LeftHip, LeftKnee),
            Self::RightHip => (RightShoulder, RightHip, RightKnee),
            Self::LeftElbow => (LeftShoulder, LeftElbow, LeftWrist),
            Self::RightElbow => (RightShoulder, RightElbow, RightWrist),
            Self::LeftShoulder => (LeftHip, LeftShoulder, LeftElbow),
            Self::RightShoulder => (RightHip, RightShoulder, RightElbow),
            Self::LeftBodyLine => (LeftShoulder, LeftHip, LeftAnkle),
            Self::RightBodyLine => (RightShoulder, RightHip, RightAnkle),
        }
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Joint angle calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAngle {
    pub joint: Joint,
    /// Angle in degrees, always within [0, 180]
    pub angle_degrees: f32,
    /// False when the geometry was degenerate (zero-length segment)
    pub is_valid: bool,
    /// Mean of visibility and presence over the three landmarks
    pub confidence: f32,
    pub previous_angle: Option<f32>,
    /// Degrees per second since the previous sample of this joint
    pub angular_velocity: Option<f32>,
}

impl JointAngle {
    pub fn new(joint: Joint, angle_degrees: f32, confidence: f32) -> Self {
        Self {
            joint,
            angle_degrees: clamp_angle(angle_degrees),
            is_valid: true,
            confidence: confidence.clamp(0.0, 1.0),
            previous_angle: None,
            angular_velocity: None,
        }
    }

    pub fn with_velocity(mut self, previous_angle: f32, angular_velocity: f32) -> Self {
        self.previous_angle = Some(previous_angle);
        self.angular_velocity = Some(angular_velocity);
        self
    }
}

/// Angles keyed by joint. A missing key means "insufficient data",
/// which is distinct from a present entry flagged invalid.
pub type AngleMap = BTreeMap<Joint, JointAngle>;

/// Clamp to [0, 180], mapping NaN to 0
pub fn clamp_angle(angle: f32) -> f32 {
    if angle.is_nan() {
        0.0
    } else {
        angle.clamp(0.0, 180.0)
    }
}

/// Mean of the valid angles among `joints`, or None if none is present
pub fn mean_angle(angles: &AngleMap, joints: &[Joint]) -> Option<f32> {
    let values: Vec<f32> = joints
        .iter()
        .filter_map(|j| angles.get(j))
        .filter(|a| a.is_valid)
        .map(|a| a.angle_degrees)
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}

/// Smallest valid angle among `joints`
pub fn min_angle(angles: &AngleMap, joints: &[Joint]) -> Option<(Joint, f32)> {
    joints
        .iter()
        .filter_map(|j| angles.get(j))
        .filter(|a| a.is_valid)
        .map(|a| (a.joint, a.angle_degrees))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_names() {
        assert_eq!(Joint::LeftKnee.name(), "left_knee");
        assert_eq!(Joint::RightBodyLine.to_string(), "right_body_line");
    }

    #[test]
    fn test_angle_is_clamped() {
        assert_eq!(JointAngle::new(Joint::LeftKnee, 190.0, 1.0).angle_degrees, 180.0);
        assert_eq!(JointAngle::new(Joint::LeftKnee, -3.0, 1.0).angle_degrees, 0.0);
        assert_eq!(clamp_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_mean_and_min_ignore_missing_and_invalid() {
        let mut angles = AngleMap::new();
        angles.insert(Joint::LeftKnee, JointAngle::new(Joint::LeftKnee, 100.0, 0.9));
        let mut invalid = JointAngle::new(Joint::RightKnee, 0.0, 0.9);
        invalid.is_valid = false;
        angles.insert(Joint::RightKnee, invalid);

        assert_eq!(mean_angle(&angles, &[Joint::LeftKnee, Joint::RightKnee]), Some(100.0));
        assert_eq!(
            min_angle(&angles, &[Joint::LeftKnee, Joint::RightKnee]),
            Some((Joint::LeftKnee, 100.0))
        );
        assert_eq!(mean_angle(&angles, &[Joint::LeftElbow]), None);
    }
}
