//! Driving port for the forgotten-password flow.

use std::fmt;

use async_trait::async_trait;

use crate::domain::Error;

/// Raw reset fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    /// Plaintext token from the reset link.
    pub token: Option<String>,
    /// Account email.
    pub email: Option<String>,
    /// Replacement password.
    pub password: Option<String>,
    /// Repetition of `password`.
    pub password_confirmation: Option<String>,
}

impl fmt::Debug for ResetPasswordForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Issue and redeem password reset tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordReset: Send + Sync {
    /// Issue a token when an account matches `email`.
    ///
    /// Succeeds identically whether or not the account exists.
    async fn request_reset_link(&self, email: Option<String>) -> Result<(), Error>;

    /// Redeem a token and replace the account's password.
    async fn reset_password(&self, form: ResetPasswordForm) -> Result<(), Error>;
}
