//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, the hosted APIs, etc.

pub mod audio_cue;
pub mod capture;
pub mod cleanup;
pub mod clipboard;
pub mod config;
pub mod notification;
pub mod transcription;

// Re-export adapters
pub use audio_cue::{NoOpAudioCue, RodioAudioCue};
pub use capture::{CaptureSettings, CpalRecorder};
pub use cleanup::ChatCleaner;
pub use clipboard::ArboardClipboard;
pub use config::XdgConfigStore;
pub use notification::{NoOpNotifier, NotifyRustNotifier};
pub use transcription::WhisperTranscriber;
