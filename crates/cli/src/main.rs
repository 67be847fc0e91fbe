use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use clap::Parser;
use crossbeam_channel::Receiver;

use blinkrunner_core::calibration::infrastructure::calibration_worker::{
    self, CalibrationMessage, CalibrationOutcome, CalibrationParams,
};
use blinkrunner_core::detection::domain::ear_smoother::EarSmoother;
use blinkrunner_core::detection::domain::eye::{EyeIndices, LEFT_EYE, RIGHT_EYE};
use blinkrunner_core::detection::domain::gesture_detector::{GestureDetector, GestureEvent};
use blinkrunner_core::detection::domain::thresholds::GestureThresholds;
use blinkrunner_core::pipeline::event_sink::{ChannelEventSink, EventSink};
use blinkrunner_core::pipeline::track_gestures_use_case::TrackGesturesUseCase;
use blinkrunner_core::shared::constants::CALIBRATION_TARGET_BLINKS;
use blinkrunner_core::shared::ear_gauge::EarGauge;
use blinkrunner_core::shared::landmarks::{LandmarkFrame, LandmarkSet};
use blinkrunner_core::source::domain::landmark_source::{LandmarkSource, SourceMetadata};
use blinkrunner_core::source::infrastructure::jsonl_landmark_reader::JsonlLandmarkReader;
use blinkrunner_core::source::infrastructure::paced_landmark_source::PacedLandmarkSource;
use blinkrunner_core::source::infrastructure::scripted_landmark_source::ScriptedLandmarkSource;

/// Eye-gesture detection over recorded or synthetic landmark streams.
#[derive(Parser)]
#[command(name = "blinkrunner")]
struct Cli {
    /// Recorded landmark stream (JSONL). Omit when --demo is used.
    input: Option<PathBuf>,

    /// EAR below which an eye counts as closed (0.0-1.0).
    #[arg(long, default_value = "0.25")]
    threshold: f64,

    /// Required EAR excess of the open eye for a wink (0.0-1.0).
    #[arg(long, default_value = "0.06")]
    wink_margin: f64,

    /// Run the guided five-blink calibration pass before tracking.
    #[arg(long)]
    calibrate: bool,

    /// Replay pacing in frames per second (0 = unpaced).
    #[arg(long, default_value = "30")]
    fps: f64,

    /// Print the twelve eye landmarks used for detection on every frame.
    #[arg(long)]
    show_landmarks: bool,

    /// Replay a built-in synthetic session instead of a recording.
    #[arg(long)]
    demo: bool,

    /// EMA factor for the EAR readout (1.0 = raw values).
    #[arg(long, default_value = "0.6")]
    smoothing: f64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let thresholds = Arc::new(GestureThresholds::new(cli.threshold, cli.wink_margin));
    let gauge = Arc::new(EarGauge::new());

    if cli.calibrate {
        run_calibration(&cli, &thresholds, &gauge)?;
    }
    run_tracking(&cli, &thresholds, &gauge)
}

fn run_calibration(
    cli: &Cli,
    thresholds: &Arc<GestureThresholds>,
    gauge: &Arc<EarGauge>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (source, metadata) = open_source(cli)?;

    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let (messages, cancel_worker) = calibration_worker::spawn(
        gauge.clone(),
        thresholds.clone(),
        event_rx,
        CalibrationParams::default(),
    );

    let stop_pipeline = Arc::new(AtomicBool::new(false));
    let monitor = spawn_calibration_monitor(messages, stop_pipeline.clone());

    eprintln!("Calibration: blink {CALIBRATION_TARGET_BLINKS} times deliberately.");

    let mut use_case = TrackGesturesUseCase::new(
        source,
        Box::new(ChannelEventSink::new(event_tx)),
        GestureDetector::new(thresholds.clone()),
        LEFT_EYE,
        RIGHT_EYE,
        gauge.clone(),
        None,
        Some(stop_pipeline),
    );
    let replay_result = use_case.execute(&metadata);

    // If the replay ran out before the target was reached, abandon the
    // session; a completed worker has already exited on its own.
    cancel_worker.store(true, Ordering::Relaxed);
    let outcome = monitor
        .join()
        .map_err(|_| "Calibration monitor thread panicked")?;
    replay_result?;
    eprintln!();

    match outcome {
        Some(outcome) => {
            log::info!(
                "Calibrated threshold {:.3} (observed blink minimum {})",
                outcome.threshold,
                outcome
                    .min_observed_ear
                    .map_or_else(|| "none".to_string(), |v| format!("{v:.3}")),
            );
            Ok(())
        }
        None => {
            log::warn!(
                "Calibration did not complete; keeping threshold {:.3}",
                thresholds.blink_threshold()
            );
            Ok(())
        }
    }
}

/// Drains calibration messages, drawing the progress line. On completion the
/// replay feeding the session is stopped so tracking can start over from the
/// beginning of the stream.
fn spawn_calibration_monitor(
    messages: Receiver<CalibrationMessage>,
    stop_pipeline: Arc<AtomicBool>,
) -> thread::JoinHandle<Option<CalibrationOutcome>> {
    thread::spawn(move || {
        let mut outcome = None;
        for message in messages {
            match message {
                CalibrationMessage::Progress(fraction) => {
                    eprint!("\rCalibration progress: {:3.0}%", fraction * 100.0);
                }
                CalibrationMessage::Complete(o) => {
                    outcome = Some(o);
                    stop_pipeline.store(true, Ordering::Relaxed);
                    break;
                }
                CalibrationMessage::Cancelled => break,
            }
        }
        outcome
    })
}

fn run_tracking(
    cli: &Cli,
    thresholds: &Arc<GestureThresholds>,
    gauge: &Arc<EarGauge>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut source, metadata) = open_source(cli)?;
    if cli.show_landmarks {
        source = Box::new(LandmarkPrinter::new(source));
    }

    let smoother = Mutex::new(EarSmoother::new(cli.smoothing));
    let gauge_readout = gauge.clone();
    let thresholds_readout = thresholds.clone();
    let progress: Box<dyn Fn(usize, usize) -> bool + Send> = Box::new(move |current, total| {
        match gauge_readout.average() {
            Some(ear) => {
                let smoothed = smoother.lock().unwrap().smooth(ear);
                eprint!(
                    "\rframe {current}/{total}  EAR {smoothed:.3}  threshold {:.3}",
                    thresholds_readout.blink_threshold()
                );
            }
            None => eprint!("\rframe {current}/{total}  EAR --"),
        }
        true
    });

    let mut use_case = TrackGesturesUseCase::new(
        source,
        Box::new(ConsoleEventSink),
        GestureDetector::new(thresholds.clone()),
        LEFT_EYE,
        RIGHT_EYE,
        gauge.clone(),
        Some(progress),
        None,
    );
    use_case.execute(&metadata)?;
    eprintln!();
    log::info!("Replay finished");
    Ok(())
}

fn open_source(
    cli: &Cli,
) -> Result<(Box<dyn LandmarkSource>, SourceMetadata), Box<dyn std::error::Error>> {
    let inner: Box<dyn LandmarkSource> = if cli.demo {
        Box::new(ScriptedLandmarkSource::demo())
    } else {
        Box::new(JsonlLandmarkReader::new())
    };

    let mut source: Box<dyn LandmarkSource> = if cli.fps > 0.0 {
        Box::new(PacedLandmarkSource::new(inner, cli.fps)?)
    } else {
        inner
    };

    let path = cli.input.clone().unwrap_or_else(|| PathBuf::from("demo"));
    let metadata = source.open(&path)?;
    Ok((source, metadata))
}

/// Prints gesture events to stdout, one line each, with the game binding
/// the event maps to.
struct ConsoleEventSink;

impl EventSink for ConsoleEventSink {
    fn dispatch(&mut self, event: GestureEvent) {
        let binding = match event {
            GestureEvent::Blink => "flip gravity",
            GestureEvent::RightWink => "fire",
            GestureEvent::LeftWink => "unbound",
        };
        println!("{event:<10} -> {binding}");
    }
}

/// Debug overlay, terminal edition: prints the twelve eye landmarks of each
/// face frame to stderr.
struct LandmarkPrinter {
    inner: Box<dyn LandmarkSource>,
}

impl LandmarkPrinter {
    fn new(inner: Box<dyn LandmarkSource>) -> Self {
        Self { inner }
    }
}

impl LandmarkSource for LandmarkPrinter {
    fn open(&mut self, path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        self.inner.open(path)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<LandmarkFrame, Box<dyn std::error::Error>>> + '_> {
        Box::new(self.inner.frames().inspect(|result| {
            if let Ok(frame) = result {
                if let Some(landmarks) = &frame.landmarks {
                    eprintln!(
                        "frame {:>5}  L {}  R {}",
                        frame.index,
                        format_eye(landmarks, &LEFT_EYE),
                        format_eye(landmarks, &RIGHT_EYE)
                    );
                }
            }
        }))
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

fn format_eye(landmarks: &LandmarkSet, eye: &EyeIndices) -> String {
    let coords: Vec<String> = eye
        .ordered()
        .into_iter()
        .map(|id| {
            let p = landmarks.point(id);
            format!("({:.3},{:.3})", p.x, p.y)
        })
        .collect();
    coords.join(" ")
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.demo && cli.input.is_some() {
        return Err("An input recording and --demo are mutually exclusive".into());
    }
    if !cli.demo && cli.input.is_none() {
        return Err("Input recording is required unless --demo is used".into());
    }
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if !(0.0..=1.0).contains(&cli.threshold) {
        return Err(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            cli.threshold
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.wink_margin) {
        return Err(format!(
            "Wink margin must be between 0.0 and 1.0, got {}",
            cli.wink_margin
        )
        .into());
    }
    if cli.fps < 0.0 {
        return Err(format!("Fps must be zero or positive, got {}", cli.fps).into());
    }
    if cli.calibrate && cli.fps == 0.0 {
        return Err("--calibrate requires paced replay (--fps > 0)".into());
    }
    if !(cli.smoothing > 0.0 && cli.smoothing <= 1.0) {
        return Err(format!(
            "Smoothing must be in (0.0, 1.0], got {}",
            cli.smoothing
        )
        .into());
    }
    Ok(())
}
