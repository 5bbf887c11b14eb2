//! Domain primitives, policies and services.
//!
//! Purpose: model user accounts and the audited user-management pipeline
//! without depending on HTTP or storage. Outbound adapters implement the
//! traits in [`ports`]; inbound adapters call the services through the
//! driving ports.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.
//! - [`User`], [`UserId`], [`Role`]: account identity.
//! - [`UserPolicy`]: role-based authorization for user management.
//! - [`ValidationErrors`], [`validate_page_request`]: field-level rules.
//! - [`diff`], [`AuditLogger`]: change-sets and audit records.
//! - Services implementing the driving ports.

mod account_seeder;
mod account_service;
mod audit;
mod audit_logger;
mod auth_service;
mod error;
mod password;
mod password_reset_service;
mod policy;
pub mod ports;
mod role;
mod trace_id;
mod user;
mod user_management_service;
mod validation;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::account_seeder::{AccountSeeder, SeedAccount, SeedOutcome};
pub use self::account_service::AccountService;
pub use self::audit::{
    AuditAction, AuditRecord, AuditSnapshot, ChangeSet, FieldChange, REDACTED, RequestContext,
    diff,
};
pub use self::audit_logger::AuditLogger;
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::password::{PasswordRules, PasswordToolkit, PlainPassword};
pub use self::password_reset_service::{DEFAULT_RESET_TOKEN_TTL_MINUTES, PasswordResetService};
pub use self::policy::{UserAction, UserPolicy};
pub use self::role::{Role, UnknownRole};
pub use self::trace_id::TraceId;
pub use self::user::{PasswordHash, User, UserId, UserIdError};
pub use self::user_management_service::UserManagementService;
pub use self::validation::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, EMAIL_TAKEN, MAX_PER_PAGE, MAX_TEXT_LEN, PageRequest,
    ValidationErrors, validate_page_request,
};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
