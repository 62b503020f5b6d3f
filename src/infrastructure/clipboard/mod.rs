//! Clipboard adapters.

pub mod arboard;

pub use arboard::ArboardClipboard;
