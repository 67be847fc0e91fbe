use std::sync::{Arc, Mutex};

use crossbeam_channel::Sender;

use crate::detection::domain::gesture_detector::GestureEvent;

/// Receives gesture events from the pipeline, at most one call per discrete
/// closure episode per gesture.
///
/// This is the boundary to the game/UI layer; implementations decide whether
/// events cross a thread, update state in place, or get recorded.
pub trait EventSink: Send {
    fn dispatch(&mut self, event: GestureEvent);
}

/// Forwards events into a crossbeam channel.
///
/// A disconnected receiver (the consumer went away) is not an error; the
/// event is simply dropped, matching the fire-and-forget contract.
pub struct ChannelEventSink {
    tx: Sender<GestureEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: Sender<GestureEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn dispatch(&mut self, event: GestureEvent) {
        let _ = self.tx.send(event);
    }
}

/// Records dispatched events for assertions.
///
/// The shared handle stays readable after the sink is boxed and consumed by
/// a use case.
pub struct CollectingEventSink {
    events: Arc<Mutex<Vec<GestureEvent>>>,
}

impl CollectingEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn handle(&self) -> Arc<Mutex<Vec<GestureEvent>>> {
        self.events.clone()
    }
}

impl Default for CollectingEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for CollectingEventSink {
    fn dispatch(&mut self, event: GestureEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_forwards_events() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut sink = ChannelEventSink::new(tx);

        sink.dispatch(GestureEvent::Blink);
        sink.dispatch(GestureEvent::RightWink);

        assert_eq!(rx.try_recv().unwrap(), GestureEvent::Blink);
        assert_eq!(rx.try_recv().unwrap(), GestureEvent::RightWink);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_tolerates_disconnected_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let mut sink = ChannelEventSink::new(tx);
        sink.dispatch(GestureEvent::Blink); // must not panic
    }

    #[test]
    fn test_collecting_sink_records_in_order() {
        let mut sink = CollectingEventSink::new();
        let handle = sink.handle();

        sink.dispatch(GestureEvent::LeftWink);
        sink.dispatch(GestureEvent::Blink);

        assert_eq!(
            *handle.lock().unwrap(),
            vec![GestureEvent::LeftWink, GestureEvent::Blink]
        );
    }
}
