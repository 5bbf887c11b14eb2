//! Admin user management service.
//!
//! Orchestrates authorize, validate, mutate, diff and audit for the list,
//! create, update and delete flows of the [`UserManagement`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::policy::UNAUTHORIZED_ACTION;
use crate::domain::ports::{
    ListUsersQuery, NewUser, UserChanges, UserForm, UserManagement, UserPage,
    UserPersistenceError, UserRepository,
};
use crate::domain::validation::{self, EMAIL_TAKEN, ValidationErrors};
use crate::domain::{
    AuditAction, AuditLogger, AuditSnapshot, ChangeSet, Error, PasswordToolkit, PlainPassword,
    RequestContext, Role, User, UserAction, UserId, UserPolicy, diff, validate_page_request,
};

const USER_NOT_FOUND: &str = "User not found.";

/// User management service implementing the [`UserManagement`] port.
#[derive(Clone)]
pub struct UserManagementService<R> {
    users: Arc<R>,
    passwords: PasswordToolkit,
    audit: AuditLogger,
    policy: UserPolicy,
}

impl<R> UserManagementService<R> {
    /// Create a service over `users`, hashing with `passwords` and
    /// auditing through `audit`.
    pub fn new(users: Arc<R>, passwords: PasswordToolkit, audit: AuditLogger) -> Self {
        Self {
            users,
            passwords,
            audit,
            policy: UserPolicy,
        }
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            let mut errors = ValidationErrors::new();
            errors.add("email", EMAIL_TAKEN);
            errors.into_error()
        }
        UserPersistenceError::NotFound { .. } => Error::not_found(USER_NOT_FOUND),
    }
}

/// Fields accepted by create and update after validation.
struct ValidatedForm {
    name: String,
    email: String,
    role: Role,
    password: Option<PlainPassword>,
}

impl<R> UserManagementService<R>
where
    R: UserRepository,
{
    fn deny() -> Error {
        Error::forbidden(UNAUTHORIZED_ACTION)
    }

    /// Resolve the path identifier to a stored user.
    ///
    /// Only called once the role gate passed, so malformed and unknown ids
    /// are indistinguishable `not_found` outcomes for admins alone.
    async fn resolve_target(&self, target_id: &str) -> Result<User, Error> {
        let id = UserId::new(target_id).map_err(|_| Error::not_found(USER_NOT_FOUND))?;
        self.users
            .find_by_id(&id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    /// Record a uniqueness violation unless the holder is `ignore`.
    async fn check_email_available(
        &self,
        errors: &mut ValidationErrors,
        email: &str,
        ignore: Option<&UserId>,
    ) -> Result<(), Error> {
        let holder = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_persistence_error)?;
        if holder.is_some_and(|holder| Some(&holder.id) != ignore) {
            errors.add("email", EMAIL_TAKEN);
        }
        Ok(())
    }

    async fn validate_form(
        &self,
        form: &UserForm,
        target: Option<&User>,
    ) -> Result<ValidatedForm, Error> {
        let mut errors = ValidationErrors::new();

        let name = validation::name(&mut errors, form.name.as_deref());
        let email = validation::email(&mut errors, "email", form.email.as_deref());
        if let Some(email) = email.as_deref() {
            self.check_email_available(&mut errors, email, target.map(|user| &user.id))
                .await?;
        }
        let policy = self.passwords.policy();
        let password = match target {
            None => validation::new_password(&mut errors, policy, form.password.as_deref()).map(Some),
            Some(_) => {
                validation::optional_new_password(&mut errors, policy, form.password.as_deref())
            }
        };
        let role = validation::role(&mut errors, form.role.as_deref());

        let (Some(name), Some(email), Some(password), Some(role)) = (name, email, password, role)
        else {
            return Err(errors.into_error());
        };
        errors.finish()?;
        Ok(ValidatedForm {
            name,
            email,
            role,
            password,
        })
    }
}

#[async_trait]
impl<R> UserManagement for UserManagementService<R>
where
    R: UserRepository,
{
    async fn list_users(&self, actor: &User, query: ListUsersQuery) -> Result<UserPage, Error> {
        if !self.policy.authorize(actor, UserAction::ViewAny, None) {
            return Err(Self::deny());
        }
        let request = validate_page_request(query.page.as_deref(), query.per_page.as_deref())?;
        debug!(
            page = request.page(),
            per_page = request.per_page(),
            "listing users"
        );
        self.users
            .list(request)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn create_user(
        &self,
        actor: &User,
        form: UserForm,
        context: &RequestContext,
    ) -> Result<User, Error> {
        if !self.policy.authorize(actor, UserAction::Create, None) {
            return Err(Self::deny());
        }
        let valid = self.validate_form(&form, None).await?;
        let Some(password) = valid.password else {
            return Err(Error::internal("validated create form lacks a password"));
        };

        let new_user = NewUser {
            name: valid.name,
            email: valid.email,
            role: valid.role,
            password_hash: self.passwords.hash(&password)?,
            email_verified_at: None,
        };
        let created = self
            .users
            .create(new_user)
            .await
            .map_err(map_user_persistence_error)?;

        self.audit
            .log_user_management(
                AuditAction::Create,
                actor,
                Some(&created),
                context,
                ChangeSet::new(),
            )
            .await;
        info!(actor_id = %actor.id, user_id = %created.id, "user created");
        Ok(created)
    }

    async fn update_user(
        &self,
        actor: &User,
        target_id: &str,
        form: UserForm,
        context: &RequestContext,
    ) -> Result<User, Error> {
        if !self.policy.may_manage_users(actor) {
            return Err(Self::deny());
        }
        let target = self.resolve_target(target_id).await?;
        if !self.policy.authorize(actor, UserAction::Update, Some(&target)) {
            return Err(Self::deny());
        }
        let valid = self.validate_form(&form, Some(&target)).await?;

        let before = AuditSnapshot::from(&target);
        let password_hash = valid
            .password
            .as_ref()
            .map(|password| self.passwords.hash(password))
            .transpose()?;
        let password_changed = password_hash.is_some();
        let changes = UserChanges {
            name: Some(valid.name),
            email: Some(valid.email),
            role: Some(valid.role),
            password_hash,
            clear_email_verification: false,
        };
        let updated = self
            .users
            .update(&target.id, changes)
            .await
            .map_err(map_user_persistence_error)?;

        let changes = diff(&before, &AuditSnapshot::from(&updated), password_changed);
        info!(
            actor_id = %actor.id,
            user_id = %updated.id,
            changed = ?changes.fields(),
            "user updated"
        );
        self.audit
            .log_user_management(AuditAction::Update, actor, Some(&updated), context, changes)
            .await;
        Ok(updated)
    }

    async fn delete_user(
        &self,
        actor: &User,
        target_id: &str,
        context: &RequestContext,
    ) -> Result<(), Error> {
        if !self.policy.may_manage_users(actor) {
            return Err(Self::deny());
        }
        let target = self.resolve_target(target_id).await?;
        if !self.policy.authorize(actor, UserAction::Delete, Some(&target)) {
            return Err(Self::deny());
        }

        // The record must still resolve while the audit entry is written.
        self.audit
            .log_user_management(
                AuditAction::Delete,
                actor,
                Some(&target),
                context,
                ChangeSet::new(),
            )
            .await;
        self.users
            .delete(&target.id)
            .await
            .map_err(map_user_persistence_error)?;
        info!(actor_id = %actor.id, user_id = %target.id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_management_service_tests.rs"]
mod tests;
