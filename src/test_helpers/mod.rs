//! # Test Helpers
//!
//! In-memory entity stores for exercising factories without a real
//! persistence backend. Used by this crate's own tests and available to
//! embedding applications for theirs.

pub mod recording_store;

pub use recording_store::{LifecycleCall, Record, RecordingStore};
