//! Driving port for self-service account settings.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Raw profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// Raw password change fields.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordChangeForm {
    /// Password currently on record.
    pub current_password: Option<String>,
    /// Replacement password.
    pub password: Option<String>,
    /// Repetition of `password`.
    pub password_confirmation: Option<String>,
}

impl fmt::Debug for PasswordChangeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChangeForm").finish_non_exhaustive()
    }
}

/// Operations an authenticated user performs on their own account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountSettings: Send + Sync {
    /// Update name and email; a changed email clears verification.
    async fn update_profile(&self, actor: &User, form: ProfileForm) -> Result<User, Error>;

    /// Replace the password after re-verifying the current one.
    async fn change_password(&self, actor: &User, form: PasswordChangeForm) -> Result<(), Error>;

    /// Re-verify the actor's password before a sensitive action.
    async fn confirm_password(&self, actor: &User, password: Option<String>) -> Result<(), Error>;

    /// Re-verify the password then delete the account.
    async fn delete_account(&self, actor: &User, password: Option<String>) -> Result<(), Error>;
}
