use regex::Regex;
use std::sync::LazyLock;

use crate::utils::error::CustomError;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,30}$").expect("valid username pattern"));

pub fn validate_username(username: &str) -> Result<(), CustomError> {
    if !USERNAME_PATTERN.is_match(username) {
        return Err(CustomError::BadRequestError(
            "Username must be 3 to 30 letters, digits or underscores.".into(),
        ));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CustomError> {
    // Check password length
    let length = password.chars().count();
    if !(8..=20).contains(&length) {
        return Err(CustomError::BadRequestError(
            "Password must be between 8 and 20 characters long.".into(),
        ));
    }

    // Check for at least one lowercase letter, one uppercase letter, and one digit
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_lowercase || !has_uppercase || !has_digit {
        return Err(CustomError::BadRequestError(
            "Password must include at least one uppercase letter, one lowercase letter, and one number.".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_credentials() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_password("Secret123").is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn rejects_weak_passwords() {
        assert!(validate_password("Short1").is_err());
        assert!(validate_password("alllowercase1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
        assert!(validate_password("Waytoolongpassword12345").is_err());
    }
}
