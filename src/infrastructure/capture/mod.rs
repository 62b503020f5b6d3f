//! Microphone capture adapters.

pub mod cpal_recorder;
pub mod wav;

pub use cpal_recorder::{CaptureSettings, CpalRecorder};
pub use wav::encode_wav;
