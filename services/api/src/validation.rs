//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Default page size for history listings
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Largest page size served; larger requests are clamped to it
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }

    if username.chars().count() > 50 {
        return Err("Username must be at most 50 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Canonical form of an email address: the domain is lowercased, the local part kept as given
pub fn normalize_email(email: &str) -> String {
    match email.trim().rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_ascii_lowercase()),
        None => email.trim().to_string(),
    }
}

/// Validate a password chosen at registration
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let length = password.chars().count();

    if length < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if length > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a password supplied at login
pub fn validate_login_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate a history entry before it is saved
pub fn validate_history_entry(concept: &str, explanation: &str) -> Result<(), String> {
    if concept.trim().is_empty() {
        return Err("Concept is required".to_string());
    }

    if explanation.trim().is_empty() {
        return Err("Explanation is required".to_string());
    }

    Ok(())
}

/// Resolve and validate history pagination, returning `(limit, offset)`
pub fn validate_pagination(limit: Option<i64>, offset: Option<i64>) -> Result<(i64, i64), String> {
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let offset = offset.unwrap_or(0);

    if limit < 0 {
        return Err("limit must be greater than or equal to 0".to_string());
    }

    if offset < 0 {
        return Err("offset must be greater than or equal to 0".to_string());
    }

    Ok((limit.min(MAX_HISTORY_LIMIT), offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("a").is_ok());
        assert!(validate_username("ada_lovelace").is_ok());
        assert!(validate_username(&"x".repeat(50)).is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());

        assert_eq!(validate_email(""), Err("Email is required".to_string()));
        assert_eq!(
            validate_email("not-an-email"),
            Err("Invalid email format".to_string())
        );
        assert!(validate_email("a@b").is_err());
        assert!(validate_email(&format!("{}@example.com", "x".repeat(250))).is_err());
    }

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(normalize_email("a@B.COM"), "a@b.com");
        assert_eq!(normalize_email("Ada.Lovelace@Example.org"), "Ada.Lovelace@example.org");
        assert_eq!(normalize_email(" a@b.com "), "a@b.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("pw123456").is_ok());
        assert!(validate_password("sixsix").is_ok());

        assert!(validate_password("").is_err());
        assert_eq!(
            validate_password("short"),
            Err("Password must be at least 6 characters long".to_string())
        );
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_login_password_only_requires_presence() {
        assert!(validate_login_password("x").is_ok());
        assert!(validate_login_password("").is_err());
    }

    #[test]
    fn test_history_entry_rules() {
        assert!(validate_history_entry("Recursion", "It calls itself").is_ok());

        assert_eq!(
            validate_history_entry(" ", "It calls itself"),
            Err("Concept is required".to_string())
        );
        assert_eq!(
            validate_history_entry("Recursion", ""),
            Err("Explanation is required".to_string())
        );
    }

    #[test]
    fn test_pagination_defaults_and_bounds() {
        assert_eq!(validate_pagination(None, None), Ok((DEFAULT_HISTORY_LIMIT, 0)));
        assert_eq!(validate_pagination(Some(10), Some(20)), Ok((10, 20)));
        assert_eq!(validate_pagination(Some(MAX_HISTORY_LIMIT), None), Ok((100, 0)));

        assert_eq!(validate_pagination(Some(0), None), Ok((0, 0)));
        assert_eq!(validate_pagination(Some(200), Some(5)), Ok((MAX_HISTORY_LIMIT, 5)));

        assert!(validate_pagination(Some(-1), None).is_err());
        assert!(validate_pagination(None, Some(-1)).is_err());
    }
}
