//! Self-service account settings.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AccountSettings, PasswordChangeForm, ProfileForm, UserChanges, UserRepository,
};
use crate::domain::user_management_service::map_user_persistence_error;
use crate::domain::validation::{self, EMAIL_TAKEN, ValidationErrors};
use crate::domain::{Error, PasswordToolkit, User};

const PASSWORD_INCORRECT: &str = "The password is incorrect.";
const PROVIDED_PASSWORD_INCORRECT: &str = "The provided password is incorrect.";

/// Account settings service implementing the [`AccountSettings`] port.
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
    passwords: PasswordToolkit,
}

impl<R> AccountService<R> {
    /// Create a service over `users`.
    pub fn new(users: Arc<R>, passwords: PasswordToolkit) -> Self {
        Self { users, passwords }
    }
}

impl<R> AccountService<R>
where
    R: UserRepository,
{
    /// Require `value` and check it against the actor's stored hash.
    fn verify_current(
        &self,
        errors: &mut ValidationErrors,
        actor: &User,
        (field, label): (&str, &str),
        value: Option<&str>,
        mismatch: &str,
    ) -> Result<(), Error> {
        let Some(candidate) = validation::required_secret(errors, field, label, value) else {
            return Ok(());
        };
        if !self.passwords.verify(&candidate, &actor.password_hash)? {
            errors.add(field, mismatch);
        }
        Ok(())
    }
}

#[async_trait]
impl<R> AccountSettings for AccountService<R>
where
    R: UserRepository,
{
    async fn update_profile(&self, actor: &User, form: ProfileForm) -> Result<User, Error> {
        let mut errors = ValidationErrors::new();
        let name = validation::name(&mut errors, form.name.as_deref());
        let email = validation::email(&mut errors, "email", form.email.as_deref());
        if let Some(email) = email.as_deref() {
            let holder = self
                .users
                .find_by_email(email)
                .await
                .map_err(map_user_persistence_error)?;
            if holder.is_some_and(|holder| holder.id != actor.id) {
                errors.add("email", EMAIL_TAKEN);
            }
        }
        let (Some(name), Some(email)) = (name, email) else {
            return Err(errors.into_error());
        };
        errors.finish()?;

        let email_changed = email != actor.email;
        let changes = UserChanges {
            name: Some(name),
            email: Some(email),
            clear_email_verification: email_changed,
            ..UserChanges::default()
        };
        let updated = self
            .users
            .update(&actor.id, changes)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %updated.id, email_changed, "profile updated");
        Ok(updated)
    }

    async fn change_password(&self, actor: &User, form: PasswordChangeForm) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        self.verify_current(
            &mut errors,
            actor,
            ("currentPassword", "current password"),
            form.current_password.as_deref(),
            PASSWORD_INCORRECT,
        )?;
        let password =
            validation::new_password(&mut errors, self.passwords.policy(), form.password.as_deref());
        if form.password.as_deref().is_some_and(|value| !value.is_empty()) {
            validation::confirmed(
                &mut errors,
                form.password.as_deref(),
                form.password_confirmation.as_deref(),
            );
        }
        let Some(password) = password else {
            return Err(errors.into_error());
        };
        errors.finish()?;

        let changes = UserChanges {
            password_hash: Some(self.passwords.hash(&password)?),
            ..UserChanges::default()
        };
        self.users
            .update(&actor.id, changes)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %actor.id, "password changed");
        Ok(())
    }

    async fn confirm_password(&self, actor: &User, password: Option<String>) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        self.verify_current(
            &mut errors,
            actor,
            ("password", "password"),
            password.as_deref(),
            PROVIDED_PASSWORD_INCORRECT,
        )?;
        errors.finish()
    }

    async fn delete_account(&self, actor: &User, password: Option<String>) -> Result<(), Error> {
        let mut errors = ValidationErrors::new();
        self.verify_current(
            &mut errors,
            actor,
            ("password", "password"),
            password.as_deref(),
            PASSWORD_INCORRECT,
        )?;
        errors.finish()?;

        self.users
            .delete(&actor.id)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %actor.id, "account deleted by owner");
        Ok(())
    }
}
