//! Driving port for admin user management.
//!
//! Inbound adapters hand over raw, unvalidated fields; the implementation
//! owns authorization, validation, persistence and auditing.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Error, RequestContext, User};

use super::UserPage;

/// Raw `page` / `perPage` values from a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersQuery {
    /// One-based page index.
    pub page: Option<String>,
    /// Records per page.
    pub per_page: Option<String>,
}

/// Raw fields submitted to create or update a user.
///
/// On update an absent or empty `password` keeps the stored hash.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
    /// Role name, `admin` or `user`.
    pub role: Option<String>,
}

impl fmt::Debug for UserForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}

/// Admin operations over other users' accounts.
///
/// Every operation checks the actor's role before anything else, so
/// non-admins learn nothing about targets or input validity. `target_id`
/// is the raw identifier from the request path; one that does not name a
/// stored record yields `not_found`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserManagement: Send + Sync {
    /// One page of users, newest first.
    async fn list_users(&self, actor: &User, query: ListUsersQuery) -> Result<UserPage, Error>;

    /// Create a user and audit the creation.
    async fn create_user(
        &self,
        actor: &User,
        form: UserForm,
        context: &RequestContext,
    ) -> Result<User, Error>;

    /// Update a user and audit the field changes.
    async fn update_user(
        &self,
        actor: &User,
        target_id: &str,
        form: UserForm,
        context: &RequestContext,
    ) -> Result<User, Error>;

    /// Audit then delete a user other than the actor.
    async fn delete_user(
        &self,
        actor: &User,
        target_id: &str,
        context: &RequestContext,
    ) -> Result<(), Error>;
}
