//! Frame builders shared by the integration tests

#![allow(dead_code)]

use rep_coach::models::{BodyLandmark, Landmark, PoseFrame, LANDMARK_COUNT};

const SEGMENT: f32 = 0.2;

/// Full-body frame with both knees bent to `knee_degrees`
///
/// Each thigh points straight up from the knee and each shin is rotated by
/// the knee angle, so the computed knee angle equals `knee_degrees`. Torso and
/// arms stay upright.
pub fn knee_frame(timestamp_ms: i64, knee_degrees: f32) -> PoseFrame {
    use BodyLandmark::*;

    let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    let theta = knee_degrees.to_radians();
    let knee_y = 0.7;

    for (side_x, shoulder, elbow, wrist, hip, knee, ankle) in [
        (0.40, LeftShoulder, LeftElbow, LeftWrist, LeftHip, LeftKnee, LeftAnkle),
        (0.60, RightShoulder, RightElbow, RightWrist, RightHip, RightKnee, RightAnkle),
    ] {
        let hip_y = knee_y - SEGMENT;
        landmarks[knee.index()] = Landmark::new(side_x, knee_y, 0.0);
        landmarks[hip.index()] = Landmark::new(side_x, hip_y, 0.0);
        landmarks[ankle.index()] = Landmark::new(
            side_x + SEGMENT * theta.sin(),
            knee_y - SEGMENT * theta.cos(),
            0.0,
        );
        landmarks[shoulder.index()] = Landmark::new(side_x, hip_y - 0.25, 0.0);
        landmarks[elbow.index()] = Landmark::new(side_x, hip_y - 0.12, 0.0);
        landmarks[wrist.index()] = Landmark::new(side_x, hip_y, 0.0);
    }
    landmarks[Nose.index()] = Landmark::new(0.5, 0.1, 0.0);

    PoseFrame::new(timestamp_ms, landmarks)
}

/// Same as `knee_frame` with both knees reported as barely visible
pub fn occluded_knee_frame(timestamp_ms: i64, knee_degrees: f32) -> PoseFrame {
    hide(
        knee_frame(timestamp_ms, knee_degrees),
        &[BodyLandmark::LeftKnee, BodyLandmark::RightKnee],
    )
}

/// Horizontal body on straight legs with both elbows bent to `elbow_degrees`
///
/// Upper arms hang straight down from the shoulders and forearms are rotated
/// by the elbow angle. Hips and ankles sit at the same height, as in a
/// push-up or plank.
pub fn push_up_frame(timestamp_ms: i64, elbow_degrees: f32) -> PoseFrame {
    use BodyLandmark::*;

    let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    let theta = elbow_degrees.to_radians();
    let body_y = 0.5;
    let upper_arm = 0.12;

    for (shoulder, elbow, wrist, hip, knee, ankle) in [
        (LeftShoulder, LeftElbow, LeftWrist, LeftHip, LeftKnee, LeftAnkle),
        (RightShoulder, RightElbow, RightWrist, RightHip, RightKnee, RightAnkle),
    ] {
        landmarks[shoulder.index()] = Landmark::new(0.30, body_y, 0.0);
        landmarks[hip.index()] = Landmark::new(0.55, body_y, 0.0);
        landmarks[knee.index()] = Landmark::new(0.68, body_y, 0.0);
        landmarks[ankle.index()] = Landmark::new(0.80, body_y, 0.0);

        let elbow_y = body_y + upper_arm;
        landmarks[elbow.index()] = Landmark::new(0.30, elbow_y, 0.0);
        landmarks[wrist.index()] = Landmark::new(
            0.30 + upper_arm * theta.sin(),
            elbow_y - upper_arm * theta.cos(),
            0.0,
        );
    }
    landmarks[Nose.index()] = Landmark::new(0.22, body_y, 0.0);

    PoseFrame::new(timestamp_ms, landmarks)
}

/// Mark the given landmarks as barely visible
pub fn hide(mut frame: PoseFrame, points: &[BodyLandmark]) -> PoseFrame {
    for point in points {
        let lm = &mut frame.landmarks[point.index()];
        *lm = lm.with_scores(0.1, 0.1);
    }
    frame
}
