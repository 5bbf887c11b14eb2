//! Process-local `PasswordResetTokenRepository`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    PasswordResetTokenRepository, ResetTokenRepositoryError, StoredResetToken,
};

/// In-memory reset token store keyed by lowercased email.
#[derive(Default)]
pub struct InMemoryPasswordResetTokenRepository {
    tokens: Mutex<HashMap<String, StoredResetToken>>,
}

impl InMemoryPasswordResetTokenRepository {
    fn lock(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, StoredResetToken>>, ResetTokenRepositoryError> {
        self.tokens
            .lock()
            .map_err(|_| ResetTokenRepositoryError::connection("in-memory token store poisoned"))
    }
}

#[async_trait]
impl PasswordResetTokenRepository for InMemoryPasswordResetTokenRepository {
    async fn put(&self, token: StoredResetToken) -> Result<(), ResetTokenRepositoryError> {
        self.lock()?.insert(token.email.to_lowercase(), token);
        Ok(())
    }

    async fn find(
        &self,
        email: &str,
    ) -> Result<Option<StoredResetToken>, ResetTokenRepositoryError> {
        Ok(self.lock()?.get(&email.to_lowercase()).cloned())
    }

    async fn remove(&self, email: &str) -> Result<(), ResetTokenRepositoryError> {
        self.lock()?.remove(&email.to_lowercase());
        Ok(())
    }
}
