//! Process-local `UserRepository` used when no database is configured.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{NewUser, UserChanges, UserPage, UserPersistenceError, UserRepository};
use crate::domain::{PageRequest, User, UserId};

/// In-memory user store with the same uniqueness rules as PostgreSQL.
///
/// Records are kept in insertion order so ties on `created_at` still list
/// newest first.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl InMemoryUserRepository {
    /// Empty store stamping records with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::connection("in-memory user store poisoned"))
    }
}

fn email_taken(users: &[User], email: &str, ignore: Option<&UserId>) -> bool {
    users
        .iter()
        .any(|user| Some(&user.id) != ignore && user.email.to_lowercase() == email.to_lowercase())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.iter().find(|user| user.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let wanted = email.to_lowercase();
        Ok(self
            .lock()?
            .iter()
            .find(|user| user.email.to_lowercase() == wanted)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.lock()?;
        if email_taken(&users, &user.email, None) {
            return Err(UserPersistenceError::duplicate_email(user.email));
        }
        let now = self.clock.utc();
        let stored = User {
            id: UserId::random(),
            name: user.name,
            email: user.email,
            role: user.role,
            email_verified_at: user.email_verified_at,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let mut users = self.lock()?;
        if let Some(email) = changes.email.as_deref() {
            if email_taken(&users, email, Some(id)) {
                return Err(UserPersistenceError::duplicate_email(email));
            }
        }
        let now = self.clock.utc();
        let user = users
            .iter_mut()
            .find(|user| user.id == *id)
            .ok_or_else(|| UserPersistenceError::not_found(id.to_string()))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if changes.clear_email_verification {
            user.email_verified_at = None;
        }
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        let mut users = self.lock()?;
        let before = users.len();
        users.retain(|user| user.id != *id);
        if users.len() == before {
            return Err(UserPersistenceError::not_found(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, request: PageRequest) -> Result<UserPage, UserPersistenceError> {
        let users = self.lock()?;
        let mut ordered: Vec<&User> = users.iter().rev().collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let per_page = usize::try_from(request.per_page()).unwrap_or(usize::MAX);
        let page = ordered
            .into_iter()
            .skip(offset)
            .take(per_page)
            .cloned()
            .collect();
        Ok(UserPage {
            users: page,
            request,
            total: users.len() as u64,
        })
    }
}
