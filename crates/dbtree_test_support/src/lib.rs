pub mod fixtures;
pub mod recording_controller;

pub use recording_controller::{ControllerEvent, RecordingController};
