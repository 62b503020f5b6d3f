//! Speech-to-text adapters.

pub mod whisper;

pub use whisper::WhisperTranscriber;
