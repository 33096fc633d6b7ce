//! Runtime module
//!
//! Provides spawned-task handles and ordered streaming primitives.

pub mod async_task;

// Re-export async task types
pub use async_task::{AsyncStream, AsyncTask, OrderedEmitter};
