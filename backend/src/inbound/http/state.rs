//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! tests can wire in-memory or mocked implementations.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{AccountSettings, LoginService, PasswordReset, UserManagement};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserManagement>,
    pub settings: Arc<dyn AccountSettings>,
    pub password_reset: Arc<dyn PasswordReset>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserManagement>,
    pub settings: Arc<dyn AccountSettings>,
    pub password_reset: Arc<dyn PasswordReset>,
    /// Source of the password confirmation timestamp.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// State using the system clock.
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_clock(ports, Arc::new(DefaultClock))
    }

    /// State with an explicit clock.
    pub fn with_clock(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            login,
            users,
            settings,
            password_reset,
        } = ports;
        Self {
            login,
            users,
            settings,
            password_reset,
            clock,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
