/// EAR below which an eye counts as closed, before calibration.
pub const DEFAULT_BLINK_THRESHOLD: f64 = 0.25;

/// Required EAR excess of the open eye over the blink threshold for a
/// one-eyed closure to count as a wink rather than blink noise.
pub const DEFAULT_WINK_MARGIN: f64 = 0.06;

/// Deliberate blinks a calibration session observes before deriving a
/// threshold.
pub const CALIBRATION_TARGET_BLINKS: usize = 5;

/// Calibration sampling period, decoupled from frame cadence so the deepest
/// point of a blink is not missed between gesture updates.
pub const CALIBRATION_SAMPLE_INTERVAL_MS: u64 = 50;

/// Headroom added above the minimum EAR observed during calibration blinks.
pub const CALIBRATION_HEADROOM: f64 = 0.05;

/// Upper clamp on the calibrated threshold. Keeps a degenerate session (eyes
/// never fully closed) from producing a threshold that misclassifies normal
/// open-eye EAR values as closed.
pub const CALIBRATION_THRESHOLD_CEILING: f64 = 0.35;

/// Replay pacing assumed for recordings that do not state their capture rate.
pub const DEFAULT_SOURCE_FPS: f64 = 30.0;
