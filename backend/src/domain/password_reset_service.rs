//! Forgotten-password flow: token issue and redemption.
//!
//! Only the SHA-256 digest of a token is stored. Requests for unknown
//! accounts succeed silently so the endpoint cannot be used to probe which
//! emails are registered.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info};

use crate::domain::ports::{
    PasswordReset, PasswordResetNotifier, PasswordResetTokenRepository, ResetPasswordForm,
    ResetTokenRepositoryError, StoredResetToken, UserChanges, UserRepository,
};
use crate::domain::user_management_service::map_user_persistence_error;
use crate::domain::validation::{self, ValidationErrors};
use crate::domain::{Error, PasswordToolkit};

/// Default lifetime of an issued token.
pub const DEFAULT_RESET_TOKEN_TTL_MINUTES: i64 = 60;

const INVALID_TOKEN: &str = "This password reset token is invalid.";
const TOKEN_BYTES: usize = 32;

fn map_token_error(error: ResetTokenRepositoryError) -> Error {
    match error {
        ResetTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reset token repository unavailable: {message}"))
        }
        ResetTokenRepositoryError::Query { message } => {
            Error::internal(format!("reset token repository error: {message}"))
        }
    }
}

/// Hex SHA-256 digest stored in place of a plaintext token.
pub(crate) fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Password reset service implementing the [`PasswordReset`] port.
#[derive(Clone)]
pub struct PasswordResetService<R, T> {
    users: Arc<R>,
    tokens: Arc<T>,
    notifier: Arc<dyn PasswordResetNotifier>,
    passwords: PasswordToolkit,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<R, T> PasswordResetService<R, T> {
    /// Create a service with the default token lifetime.
    pub fn new(
        users: Arc<R>,
        tokens: Arc<T>,
        notifier: Arc<dyn PasswordResetNotifier>,
        passwords: PasswordToolkit,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            notifier,
            passwords,
            clock,
            ttl: Duration::minutes(DEFAULT_RESET_TOKEN_TTL_MINUTES),
        }
    }

    /// Override how long issued tokens remain redeemable.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl<R, T> PasswordResetService<R, T>
where
    T: PasswordResetTokenRepository,
{
    async fn token_matches(&self, email: &str, token: &str) -> Result<bool, Error> {
        let Some(stored) = self.tokens.find(email).await.map_err(map_token_error)? else {
            return Ok(false);
        };
        let fresh = self.clock.utc() - stored.created_at <= self.ttl;
        Ok(fresh && stored.token_digest == token_digest(token))
    }
}

#[async_trait]
impl<R, T> PasswordReset for PasswordResetService<R, T>
where
    R: UserRepository,
    T: PasswordResetTokenRepository,
{
    async fn request_reset_link(&self, email: Option<String>) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        let Some(email) = validation::email(&mut errors, "email", email.as_deref()) else {
            return Err(errors.into_error());
        };

        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?
        else {
            debug!("reset link requested for unknown account");
            return Ok(());
        };

        let token = generate_token();
        self.tokens
            .put(StoredResetToken {
                email: user.email.clone(),
                token_digest: token_digest(&token),
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_token_error)?;

        if let Err(err) = self.notifier.send_reset_link(&user, &token).await {
            error!(error = %err, user_id = %user.id, "reset link delivery failed");
        } else {
            info!(user_id = %user.id, "reset link issued");
        }
        Ok(())
    }

    async fn reset_password(&self, form: ResetPasswordForm) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        let token = validation::required_secret(&mut errors, "token", "token", form.token.as_deref());
        let email = validation::email(&mut errors, "email", form.email.as_deref());
        let password =
            validation::new_password(&mut errors, self.passwords.policy(), form.password.as_deref());
        if form.password.as_deref().is_some_and(|value| !value.is_empty()) {
            validation::confirmed(
                &mut errors,
                form.password.as_deref(),
                form.password_confirmation.as_deref(),
            );
        }
        let (Some(token), Some(email), Some(password)) = (token, email, password) else {
            return Err(errors.into_error());
        };
        errors.finish()?;

        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?;
        let user = match user {
            Some(user) if self.token_matches(&user.email, token.expose()).await? => user,
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("email", INVALID_TOKEN);
                return Err(errors.into_error());
            }
        };

        let changes = UserChanges {
            password_hash: Some(self.passwords.hash(&password)?),
            ..UserChanges::default()
        };
        self.users
            .update(&user.id, changes)
            .await
            .map_err(map_user_persistence_error)?;
        self.tokens
            .remove(&user.email)
            .await
            .map_err(map_token_error)?;
        info!(user_id = %user.id, "password reset");
        Ok(())
    }
}

#[cfg(test)]
#[path = "password_reset_service_tests.rs"]
mod tests;
