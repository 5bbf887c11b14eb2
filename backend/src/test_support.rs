//! Wiring and doubles for integration tests.
//!
//! Compiled with the `test-support` feature. [`TestBackend`] assembles the
//! real services over in-memory storage, a cheap Argon2 hasher and capturing
//! audit and reset-link doubles.

use std::sync::{Arc, Mutex, PoisonError};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    AuditSink, AuditSinkError, NewUser, PasswordResetNotifier, ResetNotifierError, UserRepository,
};
use crate::domain::{
    AccountService, AuditLogger, AuditRecord, AuthService, PasswordResetService, PasswordRules,
    PasswordToolkit, PlainPassword, Role, User, UserManagementService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::middleware::{SecurityHeaders, Trace};
use crate::outbound::Argon2PasswordHasher;
use crate::outbound::memory::{InMemoryPasswordResetTokenRepository, InMemoryUserRepository};

/// Clock whose time only moves when told to.
#[derive(Clone)]
pub struct MutableClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self::new(start)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Audit sink keeping every record in memory.
#[derive(Clone, Default)]
pub struct CapturingAuditSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl CapturingAuditSink {
    /// Records appended so far, oldest first.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AuditSink for CapturingAuditSink {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditSinkError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

/// Reset notifier keeping `(email, token)` pairs instead of sending them.
#[derive(Clone, Default)]
pub struct CapturingResetNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl CapturingResetNotifier {
    /// Most recent token sent to `email`.
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(to, _)| to.eq_ignore_ascii_case(email))
            .map(|(_, token)| token.clone())
    }

    /// Number of links sent.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl PasswordResetNotifier for CapturingResetNotifier {
    async fn send_reset_link(&self, user: &User, token: &str) -> Result<(), ResetNotifierError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((user.email.clone(), token.to_owned()));
        Ok(())
    }
}

/// Fully wired in-memory backend.
pub struct TestBackend {
    pub state: HttpState,
    pub users: Arc<InMemoryUserRepository>,
    pub audit: CapturingAuditSink,
    pub notifier: CapturingResetNotifier,
    pub clock: MutableClock,
    passwords: PasswordToolkit,
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBackend {
    /// Backend with default password rules.
    pub fn new() -> Self {
        Self::with_rules(PasswordRules::default())
    }

    /// Backend enforcing `rules`.
    pub fn with_rules(rules: PasswordRules) -> Self {
        let clock = MutableClock::default();
        let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
        let hasher = match Argon2PasswordHasher::with_cost(256, 1, 1) {
            Ok(hasher) => hasher,
            Err(_) => Argon2PasswordHasher::default(),
        };
        let passwords = PasswordToolkit::new(Arc::new(hasher), Arc::new(rules));
        let users = Arc::new(InMemoryUserRepository::with_clock(shared_clock.clone()));
        let tokens = Arc::new(InMemoryPasswordResetTokenRepository::default());
        let audit = CapturingAuditSink::default();
        let notifier = CapturingResetNotifier::default();

        let ports = HttpStatePorts {
            login: Arc::new(AuthService::new(users.clone(), passwords.clone())),
            users: Arc::new(UserManagementService::new(
                users.clone(),
                passwords.clone(),
                AuditLogger::new(Arc::new(audit.clone()), shared_clock.clone()),
            )),
            settings: Arc::new(AccountService::new(users.clone(), passwords.clone())),
            password_reset: Arc::new(PasswordResetService::new(
                users.clone(),
                tokens,
                Arc::new(notifier.clone()),
                passwords.clone(),
                shared_clock.clone(),
            )),
        };
        Self {
            state: HttpState::with_clock(ports, shared_clock),
            users,
            audit,
            notifier,
            clock,
            passwords,
        }
    }

    /// Store a verified user with `password`, bypassing validation.
    ///
    /// # Panics
    ///
    /// Panics when hashing or storage fails.
    pub async fn seed(&self, name: &str, email: &str, role: Role, password: &str) -> User {
        let password_hash = self
            .passwords
            .hash(&PlainPassword::new(password))
            .expect("hash seed password");
        self.users
            .create(NewUser {
                name: name.to_owned(),
                email: email.to_owned(),
                role,
                password_hash,
                email_verified_at: Some(self.clock.utc()),
            })
            .await
            .expect("seed user")
    }

    /// The application as the server assembles it, with a throwaway
    /// session key and non-secure cookies.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .wrap(SecurityHeaders)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .configure(crate::inbound::http::configure),
            )
    }
}
