//! Authorization rules for user management.
//!
//! One evaluator with an explicit action enum replaces any ambient capability
//! registry; services receive it by value and call it before touching input.

use crate::domain::{Error, User};

/// Message carried by every policy denial.
pub const UNAUTHORIZED_ACTION: &str = "This action is unauthorized.";

/// Action an actor attempts against user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// List every account.
    ViewAny,
    /// Read a single account.
    View,
    /// Create an account.
    Create,
    /// Change an existing account.
    Update,
    /// Remove an existing account.
    Delete,
}

/// Pure policy deciding whether an actor may perform a [`UserAction`].
///
/// Passing `Some(target)` asserts that the target is a persisted record;
/// callers resolve it through storage first.
///
/// # Examples
/// ```no_run
/// use accounts::domain::{UserAction, UserPolicy};
/// # fn admin() -> accounts::domain::User { unimplemented!() }
///
/// let actor = admin();
/// assert!(UserPolicy.authorize(&actor, UserAction::ViewAny, None));
/// assert!(!UserPolicy.authorize(&actor, UserAction::Delete, Some(&actor)));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct UserPolicy;

impl UserPolicy {
    /// Decide whether `actor` may perform `action` on `target`.
    pub fn authorize(self, actor: &User, action: UserAction, target: Option<&User>) -> bool {
        if !self.may_manage_users(actor) {
            return false;
        }
        match action {
            UserAction::ViewAny | UserAction::Create => true,
            UserAction::View | UserAction::Update => target.is_some(),
            UserAction::Delete => target.is_some_and(|target| !actor.is_same_record(target)),
        }
    }

    /// Role gate shared by every action.
    ///
    /// Services evaluate it before resolving a target so unauthorised actors
    /// learn nothing about which records exist.
    pub fn may_manage_users(self, actor: &User) -> bool {
        actor.role.is_admin()
    }

    /// [`Self::may_manage_users`] as a `forbidden` error.
    ///
    /// Inbound adapters call this before decoding request payloads.
    pub fn require_manager(self, actor: &User) -> Result<(), Error> {
        if self.may_manage_users(actor) {
            Ok(())
        } else {
            Err(Error::forbidden(UNAUTHORIZED_ACTION))
        }
    }
}
