use crate::core::value::Value;
use regex::Regex;
use std::sync::LazyLock;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const COUNTRY_CODE_MAX_DIGITS: usize = 4;
pub const VERIFICATION_CODE_MIN_LEN: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern"));
static VERIFICATION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Z]{6,}$").expect("verification code pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("This field is required")]
    Missing,
    #[error("Invalid format")]
    InvalidFormat,
    #[error("Must be at least {min} characters")]
    TooShort { min: usize },
    #[error("Values do not match")]
    Mismatch,
}

pub type FieldResult = Result<(), FieldError>;

pub fn validate_required(value: &Value) -> FieldResult {
    if value.is_blank() {
        Err(FieldError::Missing)
    } else {
        Ok(())
    }
}

/// Shape check only: `<non-space>@<non-space>.<non-space>` somewhere in the input.
pub fn validate_email(value: &str) -> FieldResult {
    if EMAIL_SHAPE.is_match(value) {
        Ok(())
    } else {
        Err(FieldError::InvalidFormat)
    }
}

/// National number without the country code: 1 to 15 ASCII digits.
pub fn validate_phone(value: &str) -> FieldResult {
    digits_within(value, PHONE_MAX_DIGITS)
}

pub fn validate_country_code(value: &str) -> FieldResult {
    digits_within(value, COUNTRY_CODE_MAX_DIGITS)
}

pub fn validate_min_length(value: &str, min: usize) -> FieldResult {
    if value.chars().count() < min {
        Err(FieldError::TooShort { min })
    } else {
        Ok(())
    }
}

pub fn validate_password(value: &str) -> FieldResult {
    validate_min_length(value, PASSWORD_MIN_LEN)
}

pub fn validate_confirmation(value: &str, expected: &str) -> FieldResult {
    if value == expected {
        Ok(())
    } else {
        Err(FieldError::Mismatch)
    }
}

pub fn validate_verification_code(value: &str) -> FieldResult {
    validate_min_length(value, VERIFICATION_CODE_MIN_LEN)?;
    if VERIFICATION_CODE.is_match(&value.to_uppercase()) {
        Ok(())
    } else {
        Err(FieldError::InvalidFormat)
    }
}

fn digits_within(value: &str, max: usize) -> FieldResult {
    let len = value.len();
    if (1..=max).contains(&len) && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FieldError::InvalidFormat)
    }
}
