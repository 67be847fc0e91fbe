//! Edge-triggered gesture detection over the per-frame EAR stream.
//!
//! Level-triggered checks would fire once per rendered frame for a single
//! eye closure; the detector instead keeps one "already fired" flag per
//! gesture and emits only on the open-to-closed transition, re-arming when
//! the closure ends. The wink margin requires the open eye to sit decisively
//! above the threshold, so a two-eyed blink whose EARs dip a few frames
//! apart is not misread as a wink.

use std::fmt;
use std::sync::Arc;

use crate::detection::domain::ear::EarSample;
use crate::detection::domain::thresholds::GestureThresholds;

/// A discrete eye gesture, emitted at most once per closure episode.
///
/// Winks are named after the closed eye, in the subject's anatomical frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEvent {
    Blink,
    LeftWink,
    RightWink,
}

impl fmt::Display for GestureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GestureEvent::Blink => "blink",
            GestureEvent::LeftWink => "left wink",
            GestureEvent::RightWink => "right wink",
        };
        f.write_str(name)
    }
}

/// Converts successive EAR samples into edge-triggered gesture events.
///
/// One instance owns the edge flags for one face stream; thresholds are
/// shared so calibration and user controls can retune a running detector.
/// Callers must not invoke [`update`](Self::update) for no-face frames;
/// an absent face holds the previous state rather than reading as closed.
pub struct GestureDetector {
    thresholds: Arc<GestureThresholds>,
    both_closed: bool,
    left_winking: bool,
    right_winking: bool,
}

impl GestureDetector {
    pub fn new(thresholds: Arc<GestureThresholds>) -> Self {
        Self {
            thresholds,
            both_closed: false,
            left_winking: false,
            right_winking: false,
        }
    }

    /// Processes one frame's sample and returns the events it triggered.
    ///
    /// At most one event per frame: the blink and wink conditions are
    /// mutually exclusive for a single sample.
    pub fn update(&mut self, sample: EarSample) -> Vec<GestureEvent> {
        let threshold = self.thresholds.blink_threshold();
        let open_floor = threshold + self.thresholds.wink_margin();

        let left_closed = sample.left < threshold;
        let right_closed = sample.right < threshold;

        let mut events = Vec::new();

        if left_closed && right_closed {
            if !self.both_closed {
                self.both_closed = true;
                events.push(GestureEvent::Blink);
            }
        } else {
            self.both_closed = false;
        }

        let right_wink_held = right_closed && sample.left > open_floor;
        if right_wink_held {
            if !self.right_winking {
                self.right_winking = true;
                events.push(GestureEvent::RightWink);
            }
        } else {
            self.right_winking = false;
        }

        let left_wink_held = left_closed && sample.right > open_floor;
        if left_wink_held {
            if !self.left_winking {
                self.left_winking = true;
                events.push(GestureEvent::LeftWink);
            }
        } else {
            self.left_winking = false;
        }

        events
    }
}
