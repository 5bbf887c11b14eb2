//! Field-level validation shared by the account use-cases.
//!
//! Rules never stop at the first failure: every helper records its messages
//! in a [`ValidationErrors`] collector and returns `None` for the rejected
//! field, so a single request reports all violations at once.

use serde_json::{Map, Value, json};
use validator::ValidateEmail;

use crate::domain::ports::{PasswordRuleViolation, PasswordStrengthPolicy};
use crate::domain::{Error, PlainPassword, Role};

/// Maximum length of names and email addresses, in characters.
pub const MAX_TEXT_LEN: usize = 255;
/// Default page number for list queries.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size for list queries.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest accepted page size for list queries.
pub const MAX_PER_PAGE: u32 = 100;

/// Message recorded when an email address belongs to another account.
pub const EMAIL_TAKEN: &str = "The email has already been taken.";

/// Ordered collection of per-field validation messages.
///
/// # Examples
/// ```
/// use accounts::domain::{ErrorCode, ValidationErrors};
///
/// let mut errors = ValidationErrors::new();
/// errors.add("email", "The email has already been taken.");
/// let error = errors.into_error();
/// assert_eq!(error.code(), ErrorCode::InvalidRequest);
/// assert_eq!(
///     error.field_messages("email"),
///     Some(vec!["The email has already been taken."])
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field.to_owned(), vec![message])),
        }
    }

    /// Whether no violation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the rejected fields in first-seen order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Messages recorded for `field`.
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or_default()
    }

    /// `Ok(())` when empty, otherwise the collected failure as a domain error.
    pub fn finish(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    /// Convert into an invalid-request error carrying every field message.
    pub fn into_error(self) -> Error {
        let fields: Map<String, Value> = self
            .fields
            .into_iter()
            .map(|(name, messages)| (name, json!(messages)))
            .collect();
        Error::invalid_request("The given data was invalid.").with_details(json!({
            "code": "validation_failed",
            "fields": fields,
        }))
    }
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        value.into_error()
    }
}

/// Validated pagination window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build a window, returning `None` when either bound is out of range.
    pub fn new(page: u32, per_page: u32) -> Option<Self> {
        let valid = page >= 1 && (1..=MAX_PER_PAGE).contains(&per_page);
        valid.then_some(Self { page, per_page })
    }

    /// One-based page number.
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of records per page.
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of records preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn parse_integer(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
) -> Option<Option<i64>> {
    match present(value) {
        None => Some(None),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(parsed) => Some(Some(parsed)),
            Err(_) => {
                errors.add(field, format!("The {label} field must be an integer."));
                None
            }
        },
    }
}

/// Validate raw `page` / `perPage` query values.
///
/// Out-of-range values are rejected, never clamped.
///
/// # Examples
/// ```
/// use accounts::domain::validate_page_request;
///
/// let page = validate_page_request(Some("2"), None).unwrap();
/// assert_eq!((page.page(), page.per_page()), (2, 10));
/// assert!(validate_page_request(Some("0"), Some("1000")).is_err());
/// ```
pub fn validate_page_request(
    page: Option<&str>,
    per_page: Option<&str>,
) -> Result<PageRequest, Error> {
    let mut errors = ValidationErrors::new();

    let page = parse_integer(&mut errors, "page", "page", page).and_then(|value| {
        let value = value.unwrap_or(i64::from(DEFAULT_PAGE));
        match u32::try_from(value) {
            Ok(valid) if valid >= 1 => Some(valid),
            _ => {
                errors.add("page", "The page field must be at least 1.");
                None
            }
        }
    });

    let per_page = parse_integer(&mut errors, "perPage", "per page", per_page).and_then(|value| {
        let value = value.unwrap_or(i64::from(DEFAULT_PER_PAGE));
        match u32::try_from(value) {
            Ok(valid) if (1..=MAX_PER_PAGE).contains(&valid) => Some(valid),
            _ => {
                errors.add(
                    "perPage",
                    format!("The per page field must be between 1 and {MAX_PER_PAGE}."),
                );
                None
            }
        }
    });

    errors.clone().finish()?;
    page.zip(per_page)
        .and_then(|(page, per_page)| PageRequest::new(page, per_page))
        .ok_or_else(|| errors.into_error())
}

/// Required display name of at most [`MAX_TEXT_LEN`] characters.
pub(crate) fn name(errors: &mut ValidationErrors, value: Option<&str>) -> Option<String> {
    let Some(raw) = present(value) else {
        errors.add("name", "The name field is required.");
        return None;
    };
    let trimmed = raw.trim();
    if trimmed.chars().count() > MAX_TEXT_LEN {
        errors.add(
            "name",
            format!("The name field must not be greater than {MAX_TEXT_LEN} characters."),
        );
        return None;
    }
    Some(trimmed.to_owned())
}

/// Required, syntactically valid email of at most [`MAX_TEXT_LEN`] characters.
pub(crate) fn email(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    let Some(raw) = present(value) else {
        errors.add(field, "The email field is required.");
        return None;
    };
    let trimmed = raw.trim();
    let mut valid = true;
    if !trimmed.validate_email() {
        errors.add(field, "The email field must be a valid email address.");
        valid = false;
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        errors.add(
            field,
            format!("The email field must not be greater than {MAX_TEXT_LEN} characters."),
        );
        valid = false;
    }
    valid.then(|| trimmed.to_owned())
}

/// Required member of the [`Role`] set.
pub(crate) fn role(errors: &mut ValidationErrors, value: Option<&str>) -> Option<Role> {
    let Some(raw) = present(value) else {
        errors.add("role", "The role field is required.");
        return None;
    };
    match raw.parse::<Role>() {
        Ok(role) => Some(role),
        Err(_) => {
            errors.add("role", "The selected role is invalid.");
            None
        }
    }
}

/// Required non-empty secret (current password, reset token).
pub(crate) fn required_secret(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
) -> Option<PlainPassword> {
    match value.filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(PlainPassword::new(raw)),
        None => {
            errors.add(field, format!("The {label} field is required."));
            None
        }
    }
}

/// Required new password satisfying the strength policy.
pub(crate) fn new_password(
    errors: &mut ValidationErrors,
    policy: &dyn PasswordStrengthPolicy,
    value: Option<&str>,
) -> Option<PlainPassword> {
    let candidate = required_secret(errors, "password", "password", value)?;
    let violations = policy.violations(candidate.expose());
    if violations.is_empty() {
        return Some(candidate);
    }
    for violation in violations {
        errors.add("password", violation_message(violation));
    }
    None
}

/// Optional new password: absent or empty means "leave unchanged".
///
/// Returns `Some(None)` for an unchanged password, `Some(Some(_))` for an
/// accepted replacement and `None` when the replacement was rejected.
pub(crate) fn optional_new_password(
    errors: &mut ValidationErrors,
    policy: &dyn PasswordStrengthPolicy,
    value: Option<&str>,
) -> Option<Option<PlainPassword>> {
    match value.filter(|raw| !raw.is_empty()) {
        None => Some(None),
        Some(raw) => new_password(errors, policy, Some(raw)).map(Some),
    }
}

/// Confirmation must repeat the new password exactly.
pub(crate) fn confirmed(
    errors: &mut ValidationErrors,
    password: Option<&str>,
    confirmation: Option<&str>,
) -> bool {
    if password.is_some_and(|value| Some(value) == confirmation) {
        return true;
    }
    errors.add(
        "passwordConfirmation",
        "The password field confirmation does not match.",
    );
    false
}

fn violation_message(violation: PasswordRuleViolation) -> String {
    match violation {
        PasswordRuleViolation::TooShort { min } => {
            format!("The password field must be at least {min} characters.")
        }
        PasswordRuleViolation::MissingMixedCase => {
            "The password field must contain at least one uppercase and one lowercase letter."
                .to_owned()
        }
        PasswordRuleViolation::MissingNumber => {
            "The password field must contain at least one number.".to_owned()
        }
        PasswordRuleViolation::MissingSymbol => {
            "The password field must contain at least one symbol.".to_owned()
        }
    }
}
