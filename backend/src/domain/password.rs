//! Password primitives: zeroised plaintext, the configurable strength rules and
//! the hashing toolkit shared by the account services.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, PasswordRuleViolation, PasswordStrengthPolicy,
};
use crate::domain::{Error, PasswordHash};

/// Plaintext password held only for the duration of a request.
///
/// The buffer is wiped on drop and `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Wrap caller-provided plaintext without trimming it.
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(Zeroizing::new(plaintext.into()))
    }

    /// Borrow the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(<redacted>)")
    }
}

/// Minimum length plus optional complexity toggles.
///
/// # Examples
/// ```
/// use accounts::domain::PasswordRules;
/// use accounts::domain::ports::PasswordStrengthPolicy;
///
/// let rules = PasswordRules::default();
/// assert!(rules.meets_policy("Password123!@#"));
/// assert!(!rules.meets_policy("weak"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordRules {
    /// Minimum number of characters.
    pub min_length: usize,
    /// Require at least one uppercase and one lowercase letter.
    pub mixed_case: bool,
    /// Require at least one ASCII digit.
    pub numbers: bool,
    /// Require at least one non-alphanumeric character.
    pub symbols: bool,
}

impl Default for PasswordRules {
    fn default() -> Self {
        Self {
            min_length: 8,
            mixed_case: true,
            numbers: true,
            symbols: true,
        }
    }
}

impl PasswordStrengthPolicy for PasswordRules {
    fn violations(&self, candidate: &str) -> Vec<PasswordRuleViolation> {
        let mut found = Vec::new();
        if candidate.chars().count() < self.min_length {
            found.push(PasswordRuleViolation::TooShort {
                min: self.min_length,
            });
        }
        let has_upper = candidate.chars().any(char::is_uppercase);
        let has_lower = candidate.chars().any(char::is_lowercase);
        if self.mixed_case && !(has_upper && has_lower) {
            found.push(PasswordRuleViolation::MissingMixedCase);
        }
        if self.numbers && !candidate.chars().any(|c| c.is_ascii_digit()) {
            found.push(PasswordRuleViolation::MissingNumber);
        }
        if self.symbols
            && !candidate
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
        {
            found.push(PasswordRuleViolation::MissingSymbol);
        }
        found
    }
}

/// Hasher plus strength policy, injected together into the services.
#[derive(Clone)]
pub struct PasswordToolkit {
    hasher: Arc<dyn PasswordHasher>,
    policy: Arc<dyn PasswordStrengthPolicy>,
}

impl PasswordToolkit {
    /// Bundle a hasher and a strength policy.
    pub fn new(hasher: Arc<dyn PasswordHasher>, policy: Arc<dyn PasswordStrengthPolicy>) -> Self {
        Self { hasher, policy }
    }

    /// Strength policy used by the validation layer.
    pub fn policy(&self) -> &dyn PasswordStrengthPolicy {
        self.policy.as_ref()
    }

    /// Hash a validated plaintext password.
    pub fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, Error> {
        self.hasher
            .hash(password.expose())
            .map_err(map_hash_error)
    }

    /// Check `password` against a stored hash.
    pub fn verify(&self, password: &PlainPassword, hash: &PasswordHash) -> Result<bool, Error> {
        self.hasher
            .verify(password.expose(), hash)
            .map_err(map_hash_error)
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    match error {
        PasswordHashError::Hashing { message } => {
            Error::internal(format!("password hashing failed: {message}"))
        }
        PasswordHashError::MalformedHash { message } => {
            Error::internal(format!("stored password hash is malformed: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPasswordHasher;
    use rstest::rstest;

    #[rstest]
    #[case("Password123!@#", vec![])]
    #[case("Admin123!@#", vec![])]
    #[case("weak", vec![
        PasswordRuleViolation::TooShort { min: 8 },
        PasswordRuleViolation::MissingMixedCase,
        PasswordRuleViolation::MissingNumber,
        PasswordRuleViolation::MissingSymbol,
    ])]
    #[case("alllowercase1!", vec![PasswordRuleViolation::MissingMixedCase])]
    #[case("NoDigitsHere!", vec![PasswordRuleViolation::MissingNumber])]
    #[case("NoSymbols123", vec![PasswordRuleViolation::MissingSymbol])]
    fn default_rules(#[case] candidate: &str, #[case] expected: Vec<PasswordRuleViolation>) {
        assert_eq!(PasswordRules::default().violations(candidate), expected);
    }

    #[test]
    fn relaxed_rules_only_check_length() {
        let rules = PasswordRules {
            min_length: 4,
            mixed_case: false,
            numbers: false,
            symbols: false,
        };
        assert!(rules.meets_policy("weak"));
        assert!(!rules.meets_policy("abc"));
    }

    #[test]
    fn plain_password_debug_is_redacted() {
        let password = PlainPassword::new("hunter2");
        assert_eq!(format!("{password:?}"), "PlainPassword(<redacted>)");
    }

    #[test]
    fn hashing_failures_become_internal_errors() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .return_once(|_| Err(PasswordHashError::hashing("out of memory")));
        let toolkit = PasswordToolkit::new(Arc::new(hasher), Arc::new(PasswordRules::default()));
        let error = toolkit
            .hash(&PlainPassword::new("Password123!@#"))
            .expect_err("hash fails");
        assert_eq!(error.code(), crate::domain::ErrorCode::InternalError);
    }
}
