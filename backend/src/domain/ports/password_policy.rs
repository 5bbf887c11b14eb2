//! Port for pluggable password strength rules.

/// Rule a candidate password failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRuleViolation {
    /// Fewer characters than required.
    TooShort {
        /// Required minimum length.
        min: usize,
    },
    /// Lacks an uppercase or a lowercase letter.
    MissingMixedCase,
    /// Lacks a digit.
    MissingNumber,
    /// Lacks a symbol.
    MissingSymbol,
}

/// Decides whether a plaintext password is strong enough.
pub trait PasswordStrengthPolicy: Send + Sync {
    /// Every rule `candidate` fails, in a stable order.
    fn violations(&self, candidate: &str) -> Vec<PasswordRuleViolation>;

    /// Whether `candidate` satisfies every rule.
    fn meets_policy(&self, candidate: &str) -> bool {
        self.violations(candidate).is_empty()
    }
}
