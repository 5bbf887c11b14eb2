//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: process-local repositories used without a database
//! - **audit**: append-only audit sinks
//! - [`Argon2PasswordHasher`]: password hashing
//! - [`LoggingResetNotifier`]: password reset delivery
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

mod argon2_hasher;
pub mod audit;
pub mod memory;
pub mod persistence;
mod reset_notifier;

pub use argon2_hasher::Argon2PasswordHasher;
pub use reset_notifier::LoggingResetNotifier;
