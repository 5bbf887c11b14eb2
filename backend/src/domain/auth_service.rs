//! Credential checks and session actor resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{LoginForm, LoginService, UserRepository};
use crate::domain::user_management_service::map_user_persistence_error;
use crate::domain::validation::{self, ValidationErrors};
use crate::domain::{Error, PasswordToolkit, User, UserId};

/// Authentication service implementing the [`LoginService`] port.
#[derive(Clone)]
pub struct AuthService<R> {
    users: Arc<R>,
    passwords: PasswordToolkit,
}

impl<R> AuthService<R> {
    /// Create a service over `users`.
    pub fn new(users: Arc<R>, passwords: PasswordToolkit) -> Self {
        Self { users, passwords }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<R> LoginService for AuthService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, form: LoginForm) -> Result<User, Error> {
        let mut errors = ValidationErrors::new();
        let email = validation::email(&mut errors, "email", form.email.as_deref());
        let password =
            validation::required_secret(&mut errors, "password", "password", form.password.as_deref());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(errors.into_error());
        };

        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?
        else {
            debug!("login attempt for unknown account");
            return Err(invalid_credentials());
        };
        if !self.passwords.verify(&password, &user.password_hash)? {
            debug!(user_id = %user.id, "login attempt with wrong password");
            return Err(invalid_credentials());
        }
        Ok(user)
    }

    async fn resolve_actor(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)
    }
}
