//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};

use accounts::domain::PasswordRules;
use accounts::inbound::http::session_config::SessionSettings;
use accounts::outbound::persistence::DbPool;

use super::settings::AppSettings;

/// Everything `create_server` needs, resolved from settings and environment.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seed_users: bool,
    pub(crate) audit_log_path: Option<PathBuf>,
    pub(crate) reset_link_base: String,
    pub(crate) reset_token_ttl: chrono::Duration,
    pub(crate) password_rules: PasswordRules,
}

impl ServerConfig {
    /// Combine loaded settings with the session cookie configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configured bind address does not parse.
    pub fn new(settings: &AppSettings, session: SessionSettings) -> std::io::Result<Self> {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Ok(Self {
            key,
            cookie_secure,
            same_site,
            bind_addr: settings.bind_addr()?,
            db_pool: None,
            seed_users: settings.seed_users,
            audit_log_path: settings.audit_log_path.clone(),
            reset_link_base: settings.reset_link_base().to_owned(),
            reset_token_ttl: settings.reset_token_ttl(),
            password_rules: settings.password_rules(),
        })
    }

    /// Attach a database connection pool for persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
