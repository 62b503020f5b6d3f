//! Transcript value objects and the cleanup instruction.

pub mod instruction;
pub mod text;

pub use instruction::CleanupInstruction;
pub use text::{CleanedText, TranscriptText};
