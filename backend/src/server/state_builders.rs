//! Builders wiring repositories, sinks and services into the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use accounts::domain::ports::{AuditSink, PasswordResetTokenRepository, UserRepository};
use accounts::domain::{
    AccountSeeder, AccountService, AuditLogger, AuthService, PasswordResetService,
    PasswordToolkit, SeedAccount, UserManagementService,
};
use accounts::inbound::http::state::{HttpState, HttpStatePorts};
use accounts::outbound::audit::{JsonLinesAuditSink, TracingAuditSink};
use accounts::outbound::memory::{InMemoryPasswordResetTokenRepository, InMemoryUserRepository};
use accounts::outbound::persistence::{DieselPasswordResetTokenRepository, DieselUserRepository};
use accounts::outbound::{Argon2PasswordHasher, LoggingResetNotifier};

use super::ServerConfig;

/// Build the HTTP state, using PostgreSQL when a pool is configured and
/// process-local storage otherwise. Seeds the built-in accounts when enabled.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the audit log cannot be opened or seeding
/// fails.
pub(crate) async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let audit = build_audit_sink(config).await?;
    match &config.db_pool {
        Some(pool) => {
            info!(storage = "postgres", "wiring repositories");
            wire_services(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselPasswordResetTokenRepository::new(pool.clone())),
                audit,
                clock,
                config,
            )
            .await
        }
        None => {
            info!(storage = "memory", "wiring repositories");
            wire_services(
                Arc::new(InMemoryUserRepository::with_clock(clock.clone())),
                Arc::new(InMemoryPasswordResetTokenRepository::default()),
                audit,
                clock,
                config,
            )
            .await
        }
    }
}

async fn build_audit_sink(config: &ServerConfig) -> std::io::Result<Arc<dyn AuditSink>> {
    match &config.audit_log_path {
        Some(path) => {
            let sink = JsonLinesAuditSink::open(path)
                .await
                .map_err(|err| std::io::Error::other(format!("audit log: {err}")))?;
            info!(path = %sink.path().display(), "audit records written to file");
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(TracingAuditSink)),
    }
}

async fn wire_services<U, T>(
    users: Arc<U>,
    tokens: Arc<T>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    config: &ServerConfig,
) -> std::io::Result<HttpState>
where
    U: UserRepository + 'static,
    T: PasswordResetTokenRepository + 'static,
{
    let passwords = PasswordToolkit::new(
        Arc::new(Argon2PasswordHasher::default()),
        Arc::new(config.password_rules),
    );

    if config.seed_users {
        let outcome = AccountSeeder::new(users.clone(), passwords.clone(), clock.clone())
            .seed(&SeedAccount::DEFAULTS)
            .await
            .map_err(|err| std::io::Error::other(format!("seeding accounts failed: {err}")))?;
        info!(
            created = outcome.created,
            existing = outcome.existing,
            "seed accounts ensured"
        );
    } else {
        info!(reason = "disabled", "account seeding skipped");
    }

    let notifier = Arc::new(LoggingResetNotifier::new(config.reset_link_base.clone()));
    let ports = HttpStatePorts {
        login: Arc::new(AuthService::new(users.clone(), passwords.clone())),
        users: Arc::new(UserManagementService::new(
            users.clone(),
            passwords.clone(),
            AuditLogger::new(audit, clock.clone()),
        )),
        settings: Arc::new(AccountService::new(users.clone(), passwords.clone())),
        password_reset: Arc::new(
            PasswordResetService::new(users, tokens, notifier, passwords, clock.clone())
                .with_ttl(config.reset_token_ttl),
        ),
    };
    Ok(HttpState::with_clock(ports, clock))
}
