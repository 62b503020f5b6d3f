//! V2T - voice to text dictation utility
//!
//! This crate records microphone audio, transcribes it with a hosted
//! speech-to-text API, and removes filler words with a hosted language model.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, Whisper, clipboard, etc.)
//! - **CLI**: Command-line interface, argument parsing, and the daemon

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
