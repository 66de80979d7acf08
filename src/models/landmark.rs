/// Landmark and pose frame models
///
/// This module provides the per-frame input of the tracking pipeline: a body
/// landmark stream in the 33-point MediaPipe topology, normalized to image
/// coordinates by the upstream detector.

use serde::{Deserialize, Serialize};

use crate::error::CoachResult;

/// Number of landmarks in a complete body pose frame
pub const LANDMARK_COUNT: usize = 33;

/// A single tracked body point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// X coordinate (normalized 0-1)
    pub x: f32,
    /// Y coordinate (normalized 0-1, grows downwards)
    pub y: f32,
    /// Depth relative to the hip midpoint
    #[serde(default)]
    pub z: f32,
    /// Likelihood the point is visible in the image (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
    /// Likelihood the point is present in the scene (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<f32>,
}

impl Landmark {
    /// Create a landmark without confidence scores
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
            presence: None,
        }
    }

    /// Attach visibility and presence scores
    pub fn with_scores(mut self, visibility: f32, presence: f32) -> Self {
        self.visibility = Some(visibility);
        self.presence = Some(presence);
        self
    }

    /// Visibility score; detectors that omit it are trusted fully
    pub fn visibility_score(&self) -> f32 {
        self.visibility.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Presence score; detectors that omit it are trusted fully
    pub fn presence_score(&self) -> f32 {
        self.presence.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Check if both scores reach the given threshold
    pub fn is_reliable(&self, min_confidence: f32) -> bool {
        self.visibility_score() >= min_confidence && self.presence_score() >= min_confidence
    }

    /// Euclidean distance to another landmark in the image plane
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// MediaPipe Pose landmark indices (33 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Shape of a frame as seen by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameShape {
    /// Full 33-point body
    Complete,
    /// Detector found nobody in the image
    NoSubject,
    /// Landmark count is neither zero nor the full topology
    Malformed { landmark_count: usize },
}

/// One detection cycle of body landmarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Frame timestamp in milliseconds
    pub timestamp_ms: i64,
    /// Landmarks in `BodyLandmark` order; empty when no subject was detected
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    pub fn new(timestamp_ms: i64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            landmarks,
        }
    }

    /// Frame reporting that no subject is in view
    pub fn empty(timestamp_ms: i64) -> Self {
        Self::new(timestamp_ms, Vec::new())
    }

    /// Decode a frame from one line of the JSON-lines stream format
    pub fn from_json(line: &str) -> CoachResult<Self> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn shape(&self) -> FrameShape {
        match self.landmarks.len() {
            0 => FrameShape::NoSubject,
            LANDMARK_COUNT => FrameShape::Complete,
            landmark_count => FrameShape::Malformed { landmark_count },
        }
    }

    /// Get landmark by body index
    pub fn landmark(&self, point: BodyLandmark) -> Option<&Landmark> {
        self.landmarks.get(point.index())
    }

    /// Get landmark only if it clears the confidence threshold
    pub fn reliable_landmark(&self, point: BodyLandmark, min_confidence: f32) -> Option<&Landmark> {
        self.landmark(point).filter(|lm| lm.is_reliable(min_confidence))
    }

    /// Mean y of the reliable landmarks in a group, if any is reliable
    pub fn mean_y(&self, points: &[BodyLandmark], min_confidence: f32) -> Option<f32> {
        let ys: Vec<f32> = points
            .iter()
            .filter_map(|p| self.reliable_landmark(*p, min_confidence))
            .map(|lm| lm.y)
            .collect();

        if ys.is_empty() {
            None
        } else {
            Some(ys.iter().sum::<f32>() / ys.len() as f32)
        }
    }

    /// Horizontal span between a left/right landmark pair
    pub fn horizontal_span(
        &self,
        left: BodyLandmark,
        right: BodyLandmark,
        min_confidence: f32,
    ) -> Option<f32> {
        let l = self.reliable_landmark(left, min_confidence)?;
        let r = self.reliable_landmark(right, min_confidence)?;
        Some((l.x - r.x).abs())
    }
}
