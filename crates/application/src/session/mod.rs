//! Session state for the Adex client.
//!
//! This module provides:
//! - The persisted session store with write-through storage
//! - Lifecycle events for subscribers (navigation, UI refresh)
//! - An in-memory storage backend

mod events;
mod memory;
mod store;

pub use events::{SessionEvent, SessionExpiredHandler};
pub use memory::MemoryStorage;
pub use store::{LOCALE_KEY, RefreshOutcome, SESSION_KEY, SessionStore};
