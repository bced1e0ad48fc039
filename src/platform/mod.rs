//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock in epoch milliseconds)
//! - Storage (LocalStorage on web, JSON files on native, memory in tests)

pub mod storage;
pub mod time;

pub use storage::{KeyValueStore, MemoryStore};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
pub use time::{Clock, ManualClock, SystemClock};
