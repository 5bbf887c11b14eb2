//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, audit sink, reset delivery) are
//! implemented by `outbound` adapters. Driving ports (user management,
//! settings, login, password reset) are implemented by domain services and
//! called from `inbound` adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_settings;
mod audit_sink;
mod login_service;
mod password_hasher;
mod password_policy;
mod password_reset;
mod password_reset_tokens;
mod user_management;
mod user_repository;

#[cfg(test)]
pub use account_settings::MockAccountSettings;
pub use account_settings::{AccountSettings, PasswordChangeForm, ProfileForm};
#[cfg(test)]
pub use audit_sink::MockAuditSink;
pub use audit_sink::{AuditSink, AuditSinkError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginForm, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use password_policy::{PasswordRuleViolation, PasswordStrengthPolicy};
#[cfg(test)]
pub use password_reset::MockPasswordReset;
pub use password_reset::{PasswordReset, ResetPasswordForm};
#[cfg(test)]
pub use password_reset_tokens::{MockPasswordResetNotifier, MockPasswordResetTokenRepository};
pub use password_reset_tokens::{
    PasswordResetNotifier, PasswordResetTokenRepository, ResetNotifierError,
    ResetTokenRepositoryError, StoredResetToken,
};
#[cfg(test)]
pub use user_management::MockUserManagement;
pub use user_management::{ListUsersQuery, UserForm, UserManagement};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    NewUser, UserChanges, UserPage, UserPersistenceError, UserRepository,
};
