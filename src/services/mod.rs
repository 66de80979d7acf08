// Pose processing services

pub mod analyzers;
pub mod joint_angle_engine;
pub mod landmark_filter;
pub mod pose_pipeline;
pub mod scalar_smoother;

pub use analyzers::{analyzer_for, ExerciseAnalyzer};
pub use joint_angle_engine::JointAngleEngine;
pub use landmark_filter::LandmarkFilter;
pub use pose_pipeline::PosePipeline;
pub use scalar_smoother::ScalarSmoother;
