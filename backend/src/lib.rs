//! Accounts backend: session-authenticated user accounts with role-based,
//! audited user management.
//!
//! The crate is a hexagonal monolith. [`domain`] holds entities, policy,
//! validation, auditing and services behind port traits; [`inbound`] adapts
//! HTTP requests onto those ports; [`outbound`] implements the driven ports
//! for PostgreSQL, memory, Argon2, audit sinks and reset delivery.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

pub use doc::ApiDoc;
pub use middleware::{SecurityHeaders, Trace};
