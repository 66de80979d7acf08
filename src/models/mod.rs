// Data models shared by the filtering, angle and counting stages

pub mod event;
pub mod exercise;
pub mod joint_angle;
pub mod landmark;
pub mod session;
pub mod summary;

pub use event::*;
pub use exercise::*;
pub use joint_angle::*;
pub use landmark::*;
pub use session::*;
pub use summary::*;
