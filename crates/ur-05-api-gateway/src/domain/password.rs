//! Password strength policy.

use thiserror::Error;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// First unmet requirement of a rejected password.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PasswordViolation {
    #[error("password must be at least 8 characters long")]
    TooShort,
    #[error("password must contain a lowercase letter")]
    NoLowercase,
    #[error("password must contain an uppercase letter")]
    NoUppercase,
    #[error("password must contain a digit")]
    NoDigit,
    #[error("password must contain a symbol")]
    NoSymbol,
}

/// Accepts passwords of at least 8 characters with a lowercase letter, an
/// uppercase letter, a digit and a symbol.
pub fn check_password(password: &str) -> Result<(), PasswordViolation> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordViolation::TooShort);
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(PasswordViolation::NoLowercase);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(PasswordViolation::NoUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordViolation::NoDigit);
    }
    if !password
        .chars()
        .any(|c| c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace()))
    {
        return Err(PasswordViolation::NoSymbol);
    }
    Ok(())
}
