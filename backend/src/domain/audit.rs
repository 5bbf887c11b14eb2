//! Audit records and the change-set differ for user management mutations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::{Role, User, UserId};

/// Placeholder written in place of sensitive values.
pub const REDACTED: &str = "[REDACTED]";

/// Mutation recorded by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// A user record was created.
    Create,
    /// A user record was changed.
    Update,
    /// A user record was removed.
    Delete,
}

impl AuditAction {
    /// Stable lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stringified before/after pair for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// Value before the mutation.
    pub before: String,
    /// Value after the mutation.
    pub after: String,
}

/// Insertion-ordered mapping of field name to [`FieldChange`].
///
/// Serialises as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(Vec<(&'static str, FieldChange)>);

impl ChangeSet {
    /// Empty change-set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change for `field`.
    pub fn push(&mut self, field: &'static str, before: impl Into<String>, after: impl Into<String>) {
        self.0.push((
            field,
            FieldChange {
                before: before.into(),
                after: after.into(),
            },
        ));
    }

    /// Change recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, change)| change)
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|(name, _)| *name).collect()
    }

    /// Number of changed fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field changed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ChangeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, change) in &self.0 {
            map.serialize_entry(field, change)?;
        }
        map.end()
    }
}

/// Tracked fields of a user captured before or after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSnapshot {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: Role,
}

impl From<&User> for AuditSnapshot {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Compute the change-set between two snapshots.
///
/// Fields are compared in the order `name`, `email`, `role` using their
/// string projections; a `password` entry with both sides redacted follows
/// when `password_changed` is set.
///
/// # Examples
/// ```
/// use accounts::domain::{AuditSnapshot, Role, diff};
///
/// let before = AuditSnapshot { name: "Ann".into(), email: "a@example.com".into(), role: Role::User };
/// let after = AuditSnapshot { role: Role::Admin, ..before.clone() };
/// let changes = diff(&before, &after, false);
/// assert_eq!(changes.fields(), vec!["role"]);
/// assert_eq!(changes.get("role").unwrap().before, "user");
/// assert_eq!(changes.get("role").unwrap().after, "admin");
/// ```
pub fn diff(before: &AuditSnapshot, after: &AuditSnapshot, password_changed: bool) -> ChangeSet {
    let mut changes = ChangeSet::new();
    let tracked = [
        ("name", before.name.as_str(), after.name.as_str()),
        ("email", before.email.as_str(), after.email.as_str()),
        ("role", before.role.as_str(), after.role.as_str()),
    ];
    for (field, old, new) in tracked {
        if old != new {
            changes.push(field, old, new);
        }
    }
    if password_changed {
        changes.push("password", REDACTED, REDACTED);
    }
    changes
}

/// Network details of the request that triggered a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Client IP address as seen by the server.
    pub ip_address: Option<String>,
    /// Raw `User-Agent` header.
    pub user_agent: Option<String>,
}

/// Immutable append-only audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    /// Mutation performed.
    pub action: AuditAction,
    /// Identifier of the acting user.
    pub actor_id: UserId,
    /// Email of the acting user.
    pub actor_email: String,
    /// Identifier of the affected user, when still resolvable.
    pub target_id: Option<UserId>,
    /// Email of the affected user.
    pub target_email: Option<String>,
    /// Role of the affected user.
    pub target_role: Option<Role>,
    /// Field-level changes, possibly empty.
    pub changes: ChangeSet,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// When the mutation was recorded (RFC 3339).
    pub occurred_at: DateTime<Utc>,
}
