use std::sync::atomic::{AtomicU64, Ordering};

use crate::shared::constants::{DEFAULT_BLINK_THRESHOLD, DEFAULT_WINK_MARGIN};

/// Shared detection configuration: the closed-eye threshold and the wink
/// discrimination margin.
///
/// Mutated by calibration or direct user input while detection is running;
/// read every frame by the gesture state machine. Each field is a single
/// atomic f64 store (bits in an `AtomicU64`), so writers never expose a torn
/// value and the last writer wins. There is no cross-field invariant to
/// protect, hence no lock.
///
/// No bounds are enforced on either setter; any caller-supplied scalar is
/// accepted. Range checking is the caller's concern (the CLI validates its
/// flags, calibration clamps its own output).
pub struct GestureThresholds {
    blink_threshold: AtomicU64,
    wink_margin: AtomicU64,
}

impl GestureThresholds {
    pub fn new(blink_threshold: f64, wink_margin: f64) -> Self {
        Self {
            blink_threshold: AtomicU64::new(blink_threshold.to_bits()),
            wink_margin: AtomicU64::new(wink_margin.to_bits()),
        }
    }

    pub fn blink_threshold(&self) -> f64 {
        f64::from_bits(self.blink_threshold.load(Ordering::Relaxed))
    }

    pub fn set_blink_threshold(&self, value: f64) {
        self.blink_threshold.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn wink_margin(&self) -> f64 {
        f64::from_bits(self.wink_margin.load(Ordering::Relaxed))
    }

    pub fn set_wink_margin(&self, value: f64) {
        self.wink_margin.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_THRESHOLD, DEFAULT_WINK_MARGIN)
    }
}
