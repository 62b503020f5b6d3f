//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod oneshot;
pub mod pipeline;
pub mod ports;
pub mod retry;
pub mod session;

// Re-export use cases
pub use oneshot::{
    OneshotError, RecordOnceCallbacks, RecordOnceInput, RecordOnceOutput, RecordOnceUseCase,
};
pub use retry::{with_retry, RetryPolicy};
pub use session::{SessionError, SessionOptions, SessionOutput, SessionUseCase};
