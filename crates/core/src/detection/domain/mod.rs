pub mod ear;
pub mod ear_smoother;
pub mod eye;
pub mod gesture_detector;
pub mod thresholds;
