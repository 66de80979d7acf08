pub mod pipeline;
pub mod smoothing;
pub mod thresholds;

pub use pipeline::PipelineConfig;
pub use smoothing::SmoothingConfig;
pub use thresholds::ThresholdTable;
