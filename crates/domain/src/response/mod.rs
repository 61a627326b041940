//! HTTP response types

mod envelope;
mod spec;

pub use envelope::Envelope;
pub use spec::{ApiResponse, UNAUTHORIZED};
