/// EMA (Exponential Moving Average) smoother for the EAR display readout.
///
/// Formula: `ema[t] = alpha * current + (1 - alpha) * ema[t-1]`
/// Default alpha: 0.6
///
/// Display only: detection and calibration consume raw per-frame values,
/// since damping would raise the observed blink minima.
pub struct EarSmoother {
    alpha: f64,
    state: Option<f64>,
}

pub const DEFAULT_ALPHA: f64 = 0.6;

impl EarSmoother {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, state: None }
    }

    pub fn smooth(&mut self, current: f64) -> f64 {
        let smoothed = match self.state {
            None => current,
            Some(prev) => self.alpha * current + (1.0 - self.alpha) * prev,
        };
        self.state = Some(smoothed);
        smoothed
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}

impl Default for EarSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
