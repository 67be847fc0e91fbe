use std::sync::atomic::{AtomicU64, Ordering};

use crate::detection::domain::ear::EarSample;

/// Shared readout of the most recent per-eye and combined EAR values.
///
/// Written only by the per-frame gesture update; read concurrently by the
/// calibration sampler and any display layer. Values are f64 bits in
/// `AtomicU64` cells, so readers always see a complete write without locks.
/// A NaN payload is the "no reading yet" sentinel.
pub struct EarGauge {
    left: AtomicU64,
    right: AtomicU64,
    average: AtomicU64,
}

impl EarGauge {
    pub fn new() -> Self {
        let sentinel = f64::NAN.to_bits();
        Self {
            left: AtomicU64::new(sentinel),
            right: AtomicU64::new(sentinel),
            average: AtomicU64::new(sentinel),
        }
    }

    /// Publishes a frame's sample. Callers must not publish for no-face
    /// frames; an absent face is not a reading.
    pub fn store(&self, sample: EarSample) {
        self.left.store(sample.left.to_bits(), Ordering::Relaxed);
        self.right.store(sample.right.to_bits(), Ordering::Relaxed);
        self.average
            .store(sample.average().to_bits(), Ordering::Relaxed);
    }

    pub fn left(&self) -> Option<f64> {
        Self::read(&self.left)
    }

    pub fn right(&self) -> Option<f64> {
        Self::read(&self.right)
    }

    /// Combined (average) EAR, or `None` before the first processed frame.
    pub fn average(&self) -> Option<f64> {
        Self::read(&self.average)
    }

    fn read(cell: &AtomicU64) -> Option<f64> {
        let value = f64::from_bits(cell.load(Ordering::Relaxed));
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }
}

impl Default for EarGauge {
    fn default() -> Self {
        Self::new()
    }
}
