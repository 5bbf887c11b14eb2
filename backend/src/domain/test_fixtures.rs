//! Shared builders for domain unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{AuditSink, AuditSinkError, PasswordHashError, PasswordHasher};
use crate::domain::{
    AuditLogger, AuditRecord, PasswordHash, PasswordRules, PasswordToolkit, Role, User, UserId,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn clock_at(utc_now: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(FixtureClock { utc_now })
}

/// A stored user whose password hash is `"plain:<email>"`.
pub(crate) fn user_with_role(email: &str, role: Role) -> User {
    User {
        id: UserId::random(),
        name: email.split('@').next().unwrap_or(email).to_owned(),
        email: email.to_owned(),
        role,
        email_verified_at: Some(fixture_timestamp()),
        password_hash: PasswordHash::new(format!("plain:{email}")),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

/// Reversible stand-in for a real hasher: `hash(p) == "plain:" + p`.
pub(crate) struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("plain:{plaintext}")))
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        Ok(hash.as_str() == format!("plain:{plaintext}"))
    }
}

pub(crate) fn plain_toolkit() -> PasswordToolkit {
    PasswordToolkit::new(Arc::new(PlainHasher), Arc::new(PasswordRules::default()))
}

/// Audit sink that keeps every record for later assertions.
#[derive(Default, Clone)]
pub(crate) struct RecordingSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl RecordingSink {
    pub(crate) fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("sink mutex").clone()
    }
}

#[async_trait]
impl AuditSink for RecordingSink {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditSinkError> {
        self.records.lock().expect("sink mutex").push(record.clone());
        Ok(())
    }
}

pub(crate) fn recording_logger() -> (AuditLogger, RecordingSink) {
    let sink = RecordingSink::default();
    let logger = AuditLogger::new(Arc::new(sink.clone()), fixed_clock());
    (logger, sink)
}
