//! Request middleware for cross-cutting response concerns.

pub mod security_headers;
pub mod trace;

pub use security_headers::SecurityHeaders;
pub use trace::Trace;
