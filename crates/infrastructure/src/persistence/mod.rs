//! Storage backends.

mod file_storage;

pub use file_storage::FileStorage;
