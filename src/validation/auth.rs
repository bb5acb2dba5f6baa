use crate::error::{AppError, Result};

/// Minimum password length, in characters.
pub const PASSWORD_MIN_LEN: usize = 8;
/// Maximum password length, in characters.
pub const PASSWORD_MAX_LEN: usize = 72;
/// Symbols accepted by the password policy.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// Validates a password against the complexity policy.
///
/// Cheap checks only; this runs before any hashing work.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    let length = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&length) {
        return Err(AppError::Validation(format!(
            "Invalid password: must be between {} and {} characters",
            PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
        )));
    }

    let mut upper = false;
    let mut lower = false;
    let mut digit = false;
    let mut symbol = false;

    for c in password.chars() {
        if c.is_uppercase() {
            upper = true;
        } else if c.is_lowercase() {
            lower = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if PASSWORD_SYMBOLS.contains(c) {
            symbol = true;
        }
    }

    if !(upper && lower && digit && symbol) {
        return Err(AppError::Validation(format!(
            "Invalid password: needs an uppercase letter, a lowercase letter, a digit and one of {}",
            PASSWORD_SYMBOLS
        )));
    }

    Ok(())
}

/// garde rule: rejects empty or whitespace-only strings.
pub fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("is required"));
    }
    Ok(())
}

/// garde rule for optional fields: absent is fine, present must not be blank.
pub fn not_blank_if_present(value: &Option<String>, ctx: &()) -> garde::Result {
    match value {
        Some(v) => not_blank(v, ctx),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_conforming_passwords() {
        let longest = format!("Aa1!{}", "x".repeat(68));
        for password in ["Abcdef1!", "Zz9^aaaa", "P@ssw0rdWithLength", longest.as_str()] {
            assert!(validate_password(password).is_ok(), "{password} should pass");
        }
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(validate_password("Ab1!xyz").is_err());
        assert!(validate_password(&format!("Aa1!{}", "x".repeat(69))).is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn rejects_missing_classes() {
        assert!(validate_password("abcdef1!").is_err(), "no uppercase");
        assert!(validate_password("ABCDEF1!").is_err(), "no lowercase");
        assert!(validate_password("Abcdefg!").is_err(), "no digit");
        assert!(validate_password("Abcdefg1").is_err(), "no symbol");
        assert!(validate_password("Abcdef1?").is_err(), "symbol outside the set");
    }

    #[test]
    fn errors_are_validation_errors() {
        match validate_password("short") {
            Err(AppError::Validation(msg)) => assert!(msg.starts_with("Invalid password")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn blank_strings_fail() {
        assert!(not_blank("  ", &()).is_err());
        assert!(not_blank("Luna", &()).is_ok());
    }

    #[test]
    fn optional_blank_strings_fail_only_when_present() {
        assert!(not_blank_if_present(&None, &()).is_ok());
        assert!(not_blank_if_present(&Some("Ana".to_string()), &()).is_ok());
        assert!(not_blank_if_present(&Some(" \t ".to_string()), &()).is_err());
    }
}
