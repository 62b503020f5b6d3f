//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod api;
pub mod audio_cue;
pub mod cleaner;
pub mod clipboard;
pub mod config;
pub mod notifier;
pub mod recorder;
pub mod transcriber;

// Re-export common types
pub use api::ApiError;
pub use audio_cue::{AudioCue, AudioCueError, AudioCueType};
pub use cleaner::TextCleaner;
pub use clipboard::{Clipboard, ClipboardError};
pub use config::ConfigStore;
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use recorder::{CaptureError, ClipRecorder, ProgressCallback, SessionRecorder};
pub use transcriber::Transcriber;
