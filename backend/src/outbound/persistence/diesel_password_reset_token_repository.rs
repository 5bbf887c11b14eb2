//! PostgreSQL-backed `PasswordResetTokenRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    PasswordResetTokenRepository, ResetTokenRepositoryError, StoredResetToken,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::PasswordResetTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::password_reset_tokens;

diesel::define_sql_function! {
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel-backed reset token storage keyed by email.
#[derive(Clone)]
pub struct DieselPasswordResetTokenRepository {
    pool: DbPool,
}

impl DieselPasswordResetTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ResetTokenRepositoryError {
    map_basic_pool_error(error, |message| ResetTokenRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ResetTokenRepositoryError {
    map_basic_diesel_error(
        error,
        ResetTokenRepositoryError::query,
        ResetTokenRepositoryError::connection,
    )
}

impl From<PasswordResetTokenRow> for StoredResetToken {
    fn from(row: PasswordResetTokenRow) -> Self {
        Self {
            email: row.email,
            token_digest: row.token_digest,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl PasswordResetTokenRepository for DieselPasswordResetTokenRepository {
    async fn put(&self, token: StoredResetToken) -> Result<(), ResetTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = PasswordResetTokenRow {
            email: token.email,
            token_digest: token.token_digest,
            created_at: token.created_at,
        };
        diesel::insert_into(password_reset_tokens::table)
            .values(&row)
            .on_conflict(password_reset_tokens::email)
            .do_update()
            .set((
                password_reset_tokens::token_digest.eq(excluded(password_reset_tokens::token_digest)),
                password_reset_tokens::created_at.eq(excluded(password_reset_tokens::created_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(
        &self,
        email: &str,
    ) -> Result<Option<StoredResetToken>, ResetTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = password_reset_tokens::table
            .filter(lower(password_reset_tokens::email).eq(lower(email)))
            .select(PasswordResetTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(StoredResetToken::from))
    }

    async fn remove(&self, email: &str) -> Result<(), ResetTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            password_reset_tokens::table
                .filter(lower(password_reset_tokens::email).eq(lower(email))),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(())
    }
}
