//! Runtime infrastructure - Tokio worker thread and the TUI bridge

mod bridge;
mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
pub use worker::run_async_worker;
