//! In-memory adapters for running without PostgreSQL.
//!
//! State lives for the life of the process. The server falls back to these
//! when no `database_url` is configured; HTTP tests use them directly.

mod reset_tokens;
mod users;

pub use reset_tokens::InMemoryPasswordResetTokenRepository;
pub use users::InMemoryUserRepository;
