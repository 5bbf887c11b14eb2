//! Driving port for login and per-request actor resolution.
//!
//! Inbound adapters authenticate credentials and re-load the session's user
//! through this port without importing persistence.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Raw login fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Account email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    ///
    /// Unknown emails and wrong passwords both yield the same
    /// `unauthorized` error.
    async fn authenticate(&self, form: LoginForm) -> Result<User, Error>;

    /// Load the user a session points at, if it still exists.
    async fn resolve_actor(&self, id: &UserId) -> Result<Option<User>, Error>;
}
