//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session client and the outside
//! world. Each port is a trait implemented by adapters in the
//! infrastructure layer, or by in-memory doubles in tests.

mod storage;
mod transport;

pub use storage::{KeyValueStorage, StorageError};
pub use transport::{HttpTransport, TransportError};
