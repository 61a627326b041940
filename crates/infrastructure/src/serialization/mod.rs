//! JSON encoding for files written by the client.
//!
//! Output is stable across runs: keys come out in `BTreeMap` order, two-space
//! indentation and a trailing newline.

mod json;

pub use json::{SerializationError, from_json_bytes, to_json_stable_bytes};
