pub mod event_sink;
pub mod track_gestures_use_case;
