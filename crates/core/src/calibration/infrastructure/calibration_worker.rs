//! Calibration worker thread.
//!
//! Two periodic activities run during a session: the gesture pipeline keeps
//! updating on frames, and this worker samples the shared EAR gauge on a
//! fixed short interval, decoupled from frame cadence so the deepest point
//! of a blink between gesture updates is still observed. The
//! worker also subscribes to the gesture-event stream to count the user's
//! deliberate blinks. On the fifth blink it derives the personalized
//! threshold, applies it, and exits. Cancellation (or losing the event
//! stream early) abandons the session without touching the thresholds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};

use crate::calibration::domain::session::CalibrationSession;
use crate::detection::domain::gesture_detector::GestureEvent;
use crate::detection::domain::thresholds::GestureThresholds;
use crate::shared::constants::{CALIBRATION_SAMPLE_INTERVAL_MS, CALIBRATION_TARGET_BLINKS};
use crate::shared::ear_gauge::EarGauge;

pub enum CalibrationMessage {
    /// Fraction of target blinks completed, in [0, 1].
    Progress(f64),
    /// Session finished; the threshold has been applied.
    Complete(CalibrationOutcome),
    /// Session abandoned (explicit cancel or event stream ended early);
    /// thresholds were left untouched.
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
pub struct CalibrationOutcome {
    /// Minimum combined EAR observed, `None` when no face was ever seen.
    pub min_observed_ear: Option<f64>,
    /// The applied threshold.
    pub threshold: f64,
}

pub struct CalibrationParams {
    pub target_blinks: usize,
    pub sample_interval: Duration,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            target_blinks: CALIBRATION_TARGET_BLINKS,
            sample_interval: Duration::from_millis(CALIBRATION_SAMPLE_INTERVAL_MS),
        }
    }
}

/// Starts a calibration session on its own thread.
///
/// Returns the message stream and a cancellation flag; setting the flag
/// abandons the session with no partial threshold update.
pub fn spawn(
    gauge: Arc<EarGauge>,
    thresholds: Arc<GestureThresholds>,
    events: Receiver<GestureEvent>,
    params: CalibrationParams,
) -> (Receiver<CalibrationMessage>, Arc<AtomicBool>) {
    let (tx, rx) = crossbeam_channel::unbounded::<CalibrationMessage>();
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_worker = cancelled.clone();

    thread::spawn(move || {
        run_session(&gauge, &thresholds, &events, &tx, &cancelled_worker, &params);
    });

    (rx, cancelled)
}

fn run_session(
    gauge: &EarGauge,
    thresholds: &GestureThresholds,
    events: &Receiver<GestureEvent>,
    tx: &Sender<CalibrationMessage>,
    cancelled: &AtomicBool,
    params: &CalibrationParams,
) {
    let mut session = CalibrationSession::new(params.target_blinks);
    let ticker = crossbeam_channel::tick(params.sample_interval);

    loop {
        if cancelled.load(Ordering::Relaxed) {
            let _ = tx.send(CalibrationMessage::Cancelled);
            return;
        }

        select! {
            recv(ticker) -> _ => {
                // No reading yet means no face was processed; skip, never
                // treat an absent face as a closed eye.
                if let Some(ear) = gauge.average() {
                    session.record_sample(ear);
                }
            }
            recv(events) -> event => match event {
                Ok(GestureEvent::Blink) => {
                    let progress = session.record_blink();
                    let _ = tx.send(CalibrationMessage::Progress(progress));

                    if session.is_complete() {
                        let threshold = session.derive_threshold();
                        thresholds.set_blink_threshold(threshold);
                        log::info!(
                            "calibration complete: min EAR {:?}, threshold {threshold:.3}",
                            session.min_observed_ear()
                        );
                        let _ = tx.send(CalibrationMessage::Complete(CalibrationOutcome {
                            min_observed_ear: session.min_observed_ear(),
                            threshold,
                        }));
                        return;
                    }
                }
                // Winks do not advance calibration.
                Ok(_) => {}
                // Event stream ended before the target was reached.
                Err(_) => {
                    log::warn!("calibration abandoned: gesture stream ended");
                    let _ = tx.send(CalibrationMessage::Cancelled);
                    return;
                }
            }
        }
    }
}
