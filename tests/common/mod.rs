pub mod harness;

// Re-export commonly used test utilities
pub use harness::{batch_reply, stream_reply, ScriptedTransport, TestHarness};
