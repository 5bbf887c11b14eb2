//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUser, UserChanges, UserPage, UserPersistenceError, UserRepository};
use crate::domain::{PageRequest, PasswordHash, Role, User, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

// Matches the `lower(email)` unique index.
diesel::define_sql_function! {
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Map a write failure, reporting email index violations as duplicates.
fn map_write_error(error: diesel::result::Error, email: Option<&str>) -> UserPersistenceError {
    match email {
        Some(email) if is_unique_violation(&error) => UserPersistenceError::duplicate_email(email),
        _ => map_diesel_error(error),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let role = row.role.parse::<Role>().map_err(|err| {
        UserPersistenceError::query(format!("invalid role stored for {}: {err}", row.id))
    })?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        name: row.name,
        email: row.email,
        role,
        email_verified_at: row.email_verified_at,
        password_hash: PasswordHash::new(row.password_hash),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn to_i64(value: u64, what: &str) -> Result<i64, UserPersistenceError> {
    i64::try_from(value).map_err(|_| UserPersistenceError::query(format!("{what} out of range")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(lower(users::email).eq(lower(email)))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *UserId::random().as_uuid(),
            name: &user.name,
            email: &user.email,
            role: user.role.as_str(),
            email_verified_at: user.email_verified_at,
            password_hash: user.password_hash.as_str(),
        };
        let stored = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, Some(&user.email)))?;
        row_to_user(stored)
    }

    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let update = UserUpdate {
            name: changes.name.as_deref(),
            email: changes.email.as_deref(),
            role: changes.role.map(Role::as_str),
            password_hash: changes.password_hash.as_ref().map(PasswordHash::as_str),
            email_verified_at: changes.clear_email_verification.then_some(None),
        };
        if update.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| UserPersistenceError::not_found(id.to_string()));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(*id.as_uuid()))
            .set(&update)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, changes.email.as_deref()))?
            .map(row_to_user)
            .transpose()?
            .ok_or_else(|| UserPersistenceError::not_found(id.to_string()))
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(UserPersistenceError::not_found(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, request: PageRequest) -> Result<UserPage, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.desc(), users::id.desc()))
            .limit(i64::from(request.per_page()))
            .offset(to_i64(request.offset(), "page offset")?)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let users = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(UserPage {
            users,
            request,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
