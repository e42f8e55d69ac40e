//! Single-field input rules for the account and search forms.
//!
//! Every rule is a pure function of the input string. Rules are checked in a
//! fixed order and the first failing one is reported.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const EMAIL_BLANK: &str = "Email can't be blank";
pub const EMAIL_UPPERCASE: &str = "Email must not contain uppercase letters";
pub const EMAIL_INVALID: &str = "That's not a valid email address";

pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";
pub const PASSWORD_NO_LETTER: &str = "Password must contain at least one letter";
pub const PASSWORD_NO_DIGIT: &str = "Password must contain at least one digit";
pub const PASSWORD_NO_SPECIAL: &str = "Password must contain at least one special character";
pub const PASSWORD_HAS_SPACE: &str = "Password must not contain spaces";
pub const PASSWORD_EMPTY: &str = "Password can't be empty";

pub const FIRST_NAME_BLANK: &str = "First name can't be blank";
pub const LAST_NAME_BLANK: &str = "Last name can't be blank";

pub const QUERY_EMPTY: &str = "Search query can't be empty";

const MIN_PASSWORD_LENGTH: usize = 8;

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationResult {
    pub successful: bool,
    pub error_message: Option<String>,
}

impl ValidationResult {
    #[must_use]
    pub const fn success() -> Self {
        Self {
            successful: true,
            error_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            successful: false,
            error_message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// The input fields that carry a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    SignUpPassword,
    LogInPassword,
    FirstName,
    LastName,
    SearchQuery,
}

#[must_use]
pub fn validate(field: Field, value: &str) -> ValidationResult {
    match field {
        Field::Email => validate_email(value),
        Field::SignUpPassword => validate_sign_up_password(value),
        Field::LogInPassword => validate_log_in_password(value),
        Field::FirstName => validate_name(value, FIRST_NAME_BLANK),
        Field::LastName => validate_name(value, LAST_NAME_BLANK),
        Field::SearchQuery => validate_search_query(value),
    }
}

fn email_regex() -> Option<&'static Regex> {
    static INSTANCE: OnceLock<Option<Regex>> = OnceLock::new();
    INSTANCE
        .get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
            )
            .ok()
        })
        .as_ref()
}

#[must_use]
pub fn validate_email(email: &str) -> ValidationResult {
    if email.trim().is_empty() {
        return ValidationResult::failure(EMAIL_BLANK);
    }

    if email.chars().any(char::is_uppercase) {
        return ValidationResult::failure(EMAIL_UPPERCASE);
    }

    match email_regex() {
        Some(re) if re.is_match(email) => ValidationResult::success(),
        _ => ValidationResult::failure(EMAIL_INVALID),
    }
}

#[must_use]
pub fn validate_sign_up_password(password: &str) -> ValidationResult {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return ValidationResult::failure(PASSWORD_TOO_SHORT);
    }

    if !password.chars().any(char::is_alphabetic) {
        return ValidationResult::failure(PASSWORD_NO_LETTER);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return ValidationResult::failure(PASSWORD_NO_DIGIT);
    }

    if password.chars().all(char::is_alphanumeric) {
        return ValidationResult::failure(PASSWORD_NO_SPECIAL);
    }

    if password.contains(' ') {
        return ValidationResult::failure(PASSWORD_HAS_SPACE);
    }

    ValidationResult::success()
}

/// Log-in only checks presence; the provider decides whether it matches.
#[must_use]
pub fn validate_log_in_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::failure(PASSWORD_EMPTY);
    }
    ValidationResult::success()
}

#[must_use]
pub fn validate_name(name: &str, blank_message: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return ValidationResult::failure(blank_message);
    }
    ValidationResult::success()
}

#[must_use]
pub fn validate_search_query(query: &str) -> ValidationResult {
    if query.trim().is_empty() {
        return ValidationResult::failure(QUERY_EMPTY);
    }
    ValidationResult::success()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane.doe@example.com").successful);
        assert!(validate_email("a+b_c%d-e@mail.example.co.uk").successful);
        assert_eq!(validate_email("").message(), Some(EMAIL_BLANK));
        assert_eq!(validate_email("   ").message(), Some(EMAIL_BLANK));
        assert_eq!(validate_email("Jane@example.com").message(), Some(EMAIL_UPPERCASE));
        assert_eq!(validate_email("jane@").message(), Some(EMAIL_INVALID));
        assert_eq!(validate_email("jane@example").message(), Some(EMAIL_INVALID));
        assert_eq!(validate_email("jane example@x.com").message(), Some(EMAIL_INVALID));
    }

    #[test]
    fn test_sign_up_password_reports_specific_violation() {
        assert!(validate_sign_up_password("abcd123!").successful);
        assert_eq!(
            validate_sign_up_password("ab1!").message(),
            Some(PASSWORD_TOO_SHORT)
        );
        assert_eq!(
            validate_sign_up_password("12345678!").message(),
            Some(PASSWORD_NO_LETTER)
        );
        assert_eq!(
            validate_sign_up_password("abcdefgh!").message(),
            Some(PASSWORD_NO_DIGIT)
        );
        assert_eq!(
            validate_sign_up_password("abcd1234").message(),
            Some(PASSWORD_NO_SPECIAL)
        );
        assert_eq!(
            validate_sign_up_password("abcd 1234!").message(),
            Some(PASSWORD_HAS_SPACE)
        );
    }

    #[test]
    fn test_log_in_password_is_looser_than_sign_up() {
        assert!(validate_log_in_password("short").successful);
        assert!(!validate_sign_up_password("short").successful);
        assert_eq!(validate_log_in_password("").message(), Some(PASSWORD_EMPTY));
    }

    #[test]
    fn test_validate_names_and_query() {
        assert!(validate(Field::FirstName, "Ada").successful);
        assert_eq!(validate(Field::FirstName, " ").message(), Some(FIRST_NAME_BLANK));
        assert_eq!(validate(Field::LastName, "").message(), Some(LAST_NAME_BLANK));
        assert!(validate(Field::SearchQuery, "  dune ").successful);
        assert_eq!(validate(Field::SearchQuery, " ").message(), Some(QUERY_EMPTY));
        assert_eq!(validate(Field::SearchQuery, "\t\n").message(), Some(QUERY_EMPTY));
    }
}
