//! Form validation for signup and login
//!
//! These checks run before anything touches the store. They return the
//! first failing check, in the same order the forms present their fields.

use super::result::{Error, Result};

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validate the signup form
pub fn validate_signup(name: &str, email: &str, password: &str, retype: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Please enter your name"));
    }
    if email.trim().is_empty() {
        return Err(Error::validation("Please enter your email"));
    }
    if password.trim().is_empty() {
        return Err(Error::validation("Please enter a password"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if retype.trim().is_empty() {
        return Err(Error::validation("Please re-type your password"));
    }
    if password != retype {
        return Err(Error::validation("Passwords do not match"));
    }
    Ok(())
}

/// Validate the login form
pub fn validate_login(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::validation("Please enter your email"));
    }
    if password.trim().is_empty() {
        return Err(Error::validation("Please enter your password"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_signup_accepts_valid_form() {
        assert!(validate_signup("Ada", "ada@uni.edu", "password1", "password1").is_ok());
    }

    #[test]
    fn test_signup_order() {
        assert_eq!(message(validate_signup("", "", "", "")), "Please enter your name");
        assert_eq!(message(validate_signup("Ada", " ", "", "")), "Please enter your email");
        assert_eq!(message(validate_signup("Ada", "a@b", "", "")), "Please enter a password");
        assert_eq!(
            message(validate_signup("Ada", "a@b", "short", "")),
            "Password must be at least 8 characters"
        );
        assert_eq!(
            message(validate_signup("Ada", "a@b", "longenough", "")),
            "Please re-type your password"
        );
        assert_eq!(
            message(validate_signup("Ada", "a@b", "longenough", "longenougH")),
            "Passwords do not match"
        );
    }

    #[test]
    fn test_login_requires_both_fields() {
        assert_eq!(message(validate_login("", "x")), "Please enter your email");
        assert_eq!(message(validate_login("a@b", "")), "Please enter your password");
        assert!(validate_login("a@b", "x").is_ok());
    }
}
