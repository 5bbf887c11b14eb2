//! Ports for password reset token storage and delivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Errors raised by reset token repositories.
    pub enum ResetTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "reset token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "reset token repository query failed: {message}",
    }
}

define_port_error! {
    /// Errors raised while delivering reset links.
    pub enum ResetNotifierError {
        /// The delivery channel rejected the message.
        Delivery { message: String } => "reset link delivery failed: {message}",
    }
}

/// Stored digest of an outstanding reset token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResetToken {
    /// Email the token was issued for.
    pub email: String,
    /// Hex SHA-256 digest of the plaintext token.
    pub token_digest: String,
    /// Issue time, used for expiry.
    pub created_at: DateTime<Utc>,
}

/// Storage for reset token digests, at most one per email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetTokenRepository: Send + Sync {
    /// Insert or replace the token for `token.email`.
    async fn put(&self, token: StoredResetToken) -> Result<(), ResetTokenRepositoryError>;

    /// Fetch the token issued for `email`, ignoring case.
    async fn find(&self, email: &str)
    -> Result<Option<StoredResetToken>, ResetTokenRepositoryError>;

    /// Remove the token issued for `email`.
    async fn remove(&self, email: &str) -> Result<(), ResetTokenRepositoryError>;
}

/// Delivers the plaintext reset token to the account holder.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetNotifier: Send + Sync {
    /// Send `token` to `user`.
    async fn send_reset_link(&self, user: &User, token: &str) -> Result<(), ResetNotifierError>;
}
