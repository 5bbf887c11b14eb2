//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PageRequest, PasswordHash, Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The email uniqueness constraint rejected the write.
        DuplicateEmail { email: String } => "email already registered: {email}",
        /// The addressed record does not exist.
        NotFound { id: String } => "user not found: {id}",
    }
}

/// Fields for a record about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address, unique case-insensitively.
    pub email: String,
    /// Granted role.
    pub role: Role,
    /// Hash of the initial password.
    pub password_hash: PasswordHash,
    /// Verification timestamp, for pre-verified accounts.
    pub email_verified_at: Option<DateTime<Utc>>,
}

/// Partial update applied to an existing record.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement role.
    pub role: Option<Role>,
    /// Replacement password hash.
    pub password_hash: Option<PasswordHash>,
    /// Reset `email_verified_at` to null.
    pub clear_email_verification: bool,
}

/// One page of users ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    /// Records on this page.
    pub users: Vec<User>,
    /// Window that produced this page.
    pub request: PageRequest,
    /// Total number of records across all pages.
    pub total: u64,
}

impl UserPage {
    /// Index of the final page (at least 1).
    pub fn last_page(&self) -> u64 {
        let per_page = u64::from(self.request.per_page());
        self.total.div_ceil(per_page).max(1)
    }
}

/// Storage for user records.
///
/// Adapters must enforce case-insensitive email uniqueness and report
/// violations as [`UserPersistenceError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a record and return it as stored.
    async fn create(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Apply `changes` to the record and return it as stored.
    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<User, UserPersistenceError>;

    /// Remove the record.
    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError>;

    /// Fetch one page of users ordered by creation time, newest first.
    async fn list(&self, request: PageRequest) -> Result<UserPage, UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(250, 100, 3)]
    fn last_page_rounds_up(#[case] total: u64, #[case] per_page: u32, #[case] expected: u64) {
        let page = UserPage {
            users: Vec::new(),
            request: PageRequest::new(1, per_page).expect("valid window"),
            total,
        };
        assert_eq!(page.last_page(), expected);
    }

    #[test]
    fn duplicate_email_names_the_address() {
        let err = UserPersistenceError::duplicate_email("a@example.com");
        assert_eq!(err.to_string(), "email already registered: a@example.com");
    }
}
