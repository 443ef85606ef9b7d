//! Presentation helpers shared by the UI layer: validation, date formatting,
//! class-name merging and debouncing.

pub mod classes;
pub mod dates;
pub mod debounce;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use validator::ValidationError;

pub use classes::cn;
pub use dates::{
    format_date, format_date_time, parse_timestamp, DATE_TIME_FORMAT, DEFAULT_DATE_FORMAT,
};
pub use debounce::Debouncer;

lazy_static! {
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    // Allowed alphabet only; the character-class requirements are checked separately
    static ref PASSWORD_CHARSET_REGEX: Regex = Regex::new(r"^[a-zA-Z\d@$!%*?&]{8,}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// At least 8 characters, one uppercase, one lowercase and one digit.
pub fn is_valid_password(password: &str) -> bool {
    PASSWORD_CHARSET_REGEX.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// `validator` hook for password fields.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if is_valid_password(password) {
        Ok(())
    } else {
        let mut err = ValidationError::new("weak_password");
        err.message = Some(
            "Password must be at least 8 characters with an uppercase letter, a lowercase letter and a digit"
                .into(),
        );
        Err(err)
    }
}

/// Null, empty collections and blank strings are empty. Numbers and booleans never are.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
