use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use super::schema::FieldKind;

/// Constraint violations for a single field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("not one of the available options: {0}")]
    NotAnOption(String),
    #[error("too long: {len} characters (max {max})")]
    TooLong { len: usize, max: usize },
    #[error("file not found: {0}")]
    MissingFile(String),
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid hardcoded regex")
});

/// Validates an email address: something, `@`, a dotted domain, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Validates a `YYYY-MM-DD` calendar date.
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

/// Validates that `value` is one of `options`.
pub fn validate_choice(value: &str, options: &[&str]) -> Result<(), ValidationError> {
    if options.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::NotAnOption(value.to_string()))
    }
}

/// Validates a maximum length counted in characters.
pub fn validate_max_len(value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len <= max {
        Ok(())
    } else {
        Err(ValidationError::TooLong { len, max })
    }
}

/// Validates that `path` names an existing regular file.
pub fn validate_file(path: &str) -> Result<(), ValidationError> {
    if Path::new(path).is_file() {
        Ok(())
    } else {
        Err(ValidationError::MissingFile(path.to_string()))
    }
}

/// Checks a field value against the constraint implied by its kind.
///
/// Empty values always pass; presence is the required-field check's job.
pub fn check_constraint(kind: FieldKind, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    match kind {
        FieldKind::Text { max_len: Some(max) } => validate_max_len(value, max),
        FieldKind::Text { max_len: None } | FieldKind::TextArea { .. } => Ok(()),
        FieldKind::Email => validate_email(value.trim()),
        FieldKind::Date => validate_date(value.trim()),
        FieldKind::Choice(options) => validate_choice(value, options),
        FieldKind::File => validate_file(value.trim()),
    }
}
