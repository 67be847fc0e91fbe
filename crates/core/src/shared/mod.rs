pub mod constants;
pub mod ear_gauge;
pub mod landmarks;
