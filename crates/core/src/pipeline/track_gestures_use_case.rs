use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::detection::domain::ear::sample_both;
use crate::detection::domain::eye::EyeIndices;
use crate::detection::domain::gesture_detector::GestureDetector;
use crate::pipeline::event_sink::EventSink;
use crate::shared::ear_gauge::EarGauge;
use crate::source::domain::landmark_source::{LandmarkSource, SourceMetadata};

/// Orchestrates the frame-driven gesture loop.
///
/// Per delivered frame: skip entirely when no face was detected (state and
/// gauge hold; an absent face must not read as closed eyes), otherwise
/// estimate both EARs, publish the gauge reading, run the state machine, and
/// dispatch any triggered events to the sink. Single-use: `execute` consumes
/// the owned components, so calling it twice will fail.
pub struct TrackGesturesUseCase {
    source: Option<Box<dyn LandmarkSource>>,
    sink: Option<Box<dyn EventSink>>,
    detector: Option<GestureDetector>,
    left_eye: EyeIndices,
    right_eye: EyeIndices,
    gauge: Arc<EarGauge>,
    on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    cancelled: Arc<AtomicBool>,
}

impl TrackGesturesUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Box<dyn LandmarkSource>,
        sink: Box<dyn EventSink>,
        detector: GestureDetector,
        left_eye: EyeIndices,
        right_eye: EyeIndices,
        gauge: Arc<EarGauge>,
        on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            source: Some(source),
            sink: Some(sink),
            detector: Some(detector),
            left_eye,
            right_eye,
            gauge,
            on_progress,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn execute(&mut self, metadata: &SourceMetadata) -> Result<(), Box<dyn std::error::Error>> {
        let mut source = self.source.take().ok_or("Pipeline already executed")?;
        let mut sink = self.sink.take().ok_or("Pipeline already executed")?;
        let mut detector = self.detector.take().ok_or("Pipeline already executed")?;
        let on_progress = self.on_progress.take();

        let total = metadata.total_frames;
        let mut processed: usize = 0;
        let mut first_error: Option<Box<dyn std::error::Error>> = None;

        for frame_result in source.frames() {
            if self.cancelled.load(Ordering::Relaxed) {
                break;
            }

            let frame = match frame_result {
                Ok(frame) => frame,
                Err(e) => {
                    first_error = Some(e);
                    break;
                }
            };

            match frame.landmarks {
                Some(landmarks) => {
                    let sample = sample_both(&landmarks, &self.left_eye, &self.right_eye);
                    self.gauge.store(sample);
                    for event in detector.update(sample) {
                        log::debug!("frame {}: {event}", frame.index);
                        sink.dispatch(event);
                    }
                }
                None => {
                    log::trace!("frame {}: no face, holding state", frame.index);
                }
            }

            processed += 1;
            if let Some(ref callback) = on_progress {
                if !callback(processed, total) {
                    first_error = Some("Cancelled".into());
                    break;
                }
            }
        }

        source.close();

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::thresholds::GestureThresholds;
    use crate::pipeline::event_sink::CollectingEventSink;
    use crate::shared::landmarks::{LandmarkFrame, LandmarkSet, Point};
    use std::path::Path;
    use std::sync::Mutex;

    // --- Stubs ---

    struct StubSource {
        frames: Vec<LandmarkFrame>,
        closed: Arc<Mutex<bool>>,
    }

    impl StubSource {
        fn new(frames: Vec<LandmarkFrame>) -> Self {
            Self {
                frames,
                closed: Arc::new(Mutex::new(false)),
            }
        }
    }

    impl LandmarkSource for StubSource {
        fn open(&mut self, _path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
            Ok(SourceMetadata {
                total_frames: self.frames.len(),
                fps: 30.0,
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<LandmarkFrame, Box<dyn std::error::Error>>> + '_>
        {
            Box::new(self.frames.drain(..).map(Ok))
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    struct FailingSource;

    impl LandmarkSource for FailingSource {
        fn open(&mut self, _path: &Path) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
            Ok(SourceMetadata {
                total_frames: 0,
                fps: 30.0,
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<LandmarkFrame, Box<dyn std::error::Error>>> + '_>
        {
            Box::new(std::iter::once(Err("source error".into())))
        }

        fn close(&mut self) {}
    }

    // --- Helpers ---

    /// Tiny twelve-point mapping so tests don't need full mesh-sized sets.
    const LEFT: EyeIndices = EyeIndices {
        outer_corner: 0,
        upper_lid_1: 1,
        upper_lid_2: 2,
        inner_corner: 3,
        lower_lid_1: 4,
        lower_lid_2: 5,
    };
    const RIGHT: EyeIndices = EyeIndices {
        outer_corner: 6,
        upper_lid_1: 7,
        upper_lid_2: 8,
        inner_corner: 9,
        lower_lid_1: 10,
        lower_lid_2: 11,
    };

    fn eye_points(origin: f64, ear: f64) -> Vec<Point> {
        let w = 0.1;
        let v = ear * w;
        vec![
            Point::new(origin, 0.5),
            Point::new(origin + 0.3 * w, 0.5 - v / 2.0),
            Point::new(origin + 0.7 * w, 0.5 - v / 2.0),
            Point::new(origin + w, 0.5),
            Point::new(origin + 0.7 * w, 0.5 + v / 2.0),
            Point::new(origin + 0.3 * w, 0.5 + v / 2.0),
        ]
    }

    fn face(index: usize, left_ear: f64, right_ear: f64) -> LandmarkFrame {
        let mut points = eye_points(0.6, left_ear);
        points.extend(eye_points(0.3, right_ear));
        LandmarkFrame::with_face(index, LandmarkSet::new(points))
    }

    fn use_case(
        frames: Vec<LandmarkFrame>,
        sink: CollectingEventSink,
        gauge: Arc<EarGauge>,
    ) -> (TrackGesturesUseCase, SourceMetadata) {
        let metadata = SourceMetadata {
            total_frames: frames.len(),
            fps: 30.0,
        };
        let uc = TrackGesturesUseCase::new(
            Box::new(StubSource::new(frames)),
            Box::new(sink),
            GestureDetector::new(Arc::new(GestureThresholds::default())),
            LEFT,
            RIGHT,
            gauge,
            None,
            None,
        );
        (uc, metadata)
    }

    use crate::detection::domain::gesture_detector::GestureEvent;

    // --- Tests ---

    #[test]
    fn test_blink_sequence_fires_single_event() {
        let sink = CollectingEventSink::new();
        let events = sink.handle();
        let frames = vec![
            face(0, 0.3, 0.3),
            face(1, 0.1, 0.1),
            face(2, 0.1, 0.1),
            face(3, 0.3, 0.3),
        ];

        let (mut uc, metadata) = use_case(frames, sink, Arc::new(EarGauge::new()));
        uc.execute(&metadata).unwrap();

        assert_eq!(*events.lock().unwrap(), vec![GestureEvent::Blink]);
    }

    #[test]
    fn test_no_face_frames_hold_state_and_fire_nothing() {
        let sink = CollectingEventSink::new();
        let events = sink.handle();
        // Closure, face lost mid-closure, still closed: the edge flag must
        // survive the gap, so only one blink fires.
        let frames = vec![
            face(0, 0.1, 0.1),
            LandmarkFrame::no_face(1),
            LandmarkFrame::no_face(2),
            face(3, 0.1, 0.1),
        ];

        let (mut uc, metadata) = use_case(frames, sink, Arc::new(EarGauge::new()));
        uc.execute(&metadata).unwrap();

        assert_eq!(*events.lock().unwrap(), vec![GestureEvent::Blink]);
    }

    #[test]
    fn test_no_face_frames_do_not_write_gauge() {
        let gauge = Arc::new(EarGauge::new());
        let frames = vec![LandmarkFrame::no_face(0), LandmarkFrame::no_face(1)];

        let (mut uc, metadata) = use_case(frames, CollectingEventSink::new(), gauge.clone());
        uc.execute(&metadata).unwrap();

        assert!(gauge.average().is_none());
    }

    #[test]
    fn test_gauge_tracks_latest_face_frame() {
        let gauge = Arc::new(EarGauge::new());
        let frames = vec![face(0, 0.3, 0.3), face(1, 0.2, 0.1), LandmarkFrame::no_face(2)];

        let (mut uc, metadata) = use_case(frames, CollectingEventSink::new(), gauge.clone());
        uc.execute(&metadata).unwrap();

        let average = gauge.average().unwrap();
        assert!((average - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_progress_reported_for_every_frame() {
        let progress_calls = Arc::new(Mutex::new(Vec::new()));
        let progress_clone = progress_calls.clone();

        let frames = vec![face(0, 0.3, 0.3), LandmarkFrame::no_face(1), face(2, 0.3, 0.3)];
        let metadata = SourceMetadata {
            total_frames: frames.len(),
            fps: 30.0,
        };

        let mut uc = TrackGesturesUseCase::new(
            Box::new(StubSource::new(frames)),
            Box::new(CollectingEventSink::new()),
            GestureDetector::new(Arc::new(GestureThresholds::default())),
            LEFT,
            RIGHT,
            Arc::new(EarGauge::new()),
            Some(Box::new(move |current, total| {
                progress_clone.lock().unwrap().push((current, total));
                true
            })),
            None,
        );
        uc.execute(&metadata).unwrap();

        assert_eq!(
            *progress_calls.lock().unwrap(),
            vec![(1, 3), (2, 3), (3, 3)]
        );
    }

    #[test]
    fn test_progress_returning_false_cancels() {
        let frames = (0..10).map(|i| face(i, 0.3, 0.3)).collect();
        let metadata = SourceMetadata {
            total_frames: 10,
            fps: 30.0,
        };

        let mut uc = TrackGesturesUseCase::new(
            Box::new(StubSource::new(frames)),
            Box::new(CollectingEventSink::new()),
            GestureDetector::new(Arc::new(GestureThresholds::default())),
            LEFT,
            RIGHT,
            Arc::new(EarGauge::new()),
            Some(Box::new(|current, _| current < 3)),
            None,
        );

        assert!(uc.execute(&metadata).is_err());
    }

    #[test]
    fn test_cancellation_via_atomic_bool_stops_cleanly() {
        let cancelled = Arc::new(AtomicBool::new(true));
        let source = StubSource::new((0..10).map(|i| face(i, 0.3, 0.3)).collect());
        let closed = source.closed.clone();
        let metadata = SourceMetadata {
            total_frames: 10,
            fps: 30.0,
        };

        let mut uc = TrackGesturesUseCase::new(
            Box::new(source),
            Box::new(CollectingEventSink::new()),
            GestureDetector::new(Arc::new(GestureThresholds::default())),
            LEFT,
            RIGHT,
            Arc::new(EarGauge::new()),
            None,
            Some(cancelled),
        );

        uc.execute(&metadata).unwrap();
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_source_error_propagates_and_closes() {
        let metadata = SourceMetadata {
            total_frames: 0,
            fps: 30.0,
        };
        let mut uc = TrackGesturesUseCase::new(
            Box::new(FailingSource),
            Box::new(CollectingEventSink::new()),
            GestureDetector::new(Arc::new(GestureThresholds::default())),
            LEFT,
            RIGHT,
            Arc::new(EarGauge::new()),
            None,
            None,
        );

        let err = uc.execute(&metadata).unwrap_err();
        assert_eq!(err.to_string(), "source error");
    }

    #[test]
    fn test_execute_is_single_use() {
        let (mut uc, metadata) = use_case(vec![], CollectingEventSink::new(), Arc::new(EarGauge::new()));
        uc.execute(&metadata).unwrap();
        assert!(uc.execute(&metadata).is_err());
    }

    #[test]
    fn test_demo_session_end_to_end() {
        use crate::detection::domain::eye::{LEFT_EYE, RIGHT_EYE};
        use crate::source::infrastructure::scripted_landmark_source::ScriptedLandmarkSource;

        let mut source = ScriptedLandmarkSource::demo();
        let metadata = source.open(Path::new("demo")).unwrap();

        let sink = CollectingEventSink::new();
        let events = sink.handle();

        let mut uc = TrackGesturesUseCase::new(
            Box::new(source),
            Box::new(sink),
            GestureDetector::new(Arc::new(GestureThresholds::default())),
            LEFT_EYE,
            RIGHT_EYE,
            Arc::new(EarGauge::new()),
            None,
            None,
        );
        uc.execute(&metadata).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                GestureEvent::Blink,
                GestureEvent::Blink,
                GestureEvent::Blink,
                GestureEvent::Blink,
                GestureEvent::Blink,
                GestureEvent::RightWink,
                GestureEvent::LeftWink,
            ]
        );
    }
}
