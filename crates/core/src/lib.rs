//! Core eye-gesture detection: converts per-frame facial-landmark sets into
//! debounced gesture events (blink, left wink, right wink) and calibrates
//! the detection threshold to the user's anatomy.
//!
//! Layering follows ports-and-adapters: `domain` modules hold the pure
//! logic, `infrastructure` modules the concrete sources and workers, and
//! `pipeline` wires them per frame. The landmark detector, capture stack,
//! and game loop live outside this crate and connect through the
//! `LandmarkSource` and `EventSink` ports plus the shared EAR gauge.

pub mod calibration;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod source;
