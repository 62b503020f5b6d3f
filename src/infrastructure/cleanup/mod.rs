//! Text cleanup adapters.

pub mod chat;

pub use chat::ChatCleaner;
