pub mod jsonl_landmark_reader;
pub mod paced_landmark_source;
pub mod scripted_landmark_source;
