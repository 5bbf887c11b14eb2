//! Password reset delivery that writes the link to the log.
//!
//! Stands in for a mail transport: the link is emitted on the
//! `password_reset` tracing target where an operator can pick it up.

use async_trait::async_trait;
use tracing::info;

use crate::domain::User;
use crate::domain::ports::{PasswordResetNotifier, ResetNotifierError};

/// Tracing target carrying reset links.
pub const RESET_TARGET: &str = "password_reset";

/// Logs the reset link for each request instead of sending mail.
#[derive(Debug, Clone)]
pub struct LoggingResetNotifier {
    link_base: String,
}

impl LoggingResetNotifier {
    /// Links are built as `{link_base}/{token}`.
    pub fn new(link_base: impl Into<String>) -> Self {
        Self {
            link_base: link_base.into().trim_end_matches('/').to_owned(),
        }
    }

    /// The link delivered for `token`.
    pub fn link_for(&self, token: &str) -> String {
        format!("{}/{token}", self.link_base)
    }
}

impl Default for LoggingResetNotifier {
    fn default() -> Self {
        Self::new("/reset-password")
    }
}

#[async_trait]
impl PasswordResetNotifier for LoggingResetNotifier {
    async fn send_reset_link(&self, user: &User, token: &str) -> Result<(), ResetNotifierError> {
        info!(
            target: RESET_TARGET,
            user_id = %user.id,
            email = %user.email,
            link = %self.link_for(token),
            "password reset link issued"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("https://accounts.example.com/reset-password")]
    #[case("https://accounts.example.com/reset-password/")]
    fn links_join_base_and_token(#[case] base: &str) {
        let notifier = LoggingResetNotifier::new(base);
        assert_eq!(
            notifier.link_for("abc123"),
            "https://accounts.example.com/reset-password/abc123"
        );
    }
}
