//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// First / last names
pub const MAX_PERSON_NAME_LEN: usize = 100;

/// Product names, SKUs, slugs
pub const MAX_NAME_LEN: usize = 200;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 20;

/// Notes, descriptions
pub const MAX_NOTE_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Registration password minimum
pub const MIN_PASSWORD_LEN: usize = 8;

/// Admin password reset minimum
pub const MIN_ADMIN_PASSWORD_LEN: usize = 6;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Field error collector ───────────────────────────────────────────

/// Collects per-field messages and turns them into one `ValidationFailed` error
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // first message per field wins
        if !self.errors.iter().any(|(f, _)| f == field) {
            self.errors.push((field.to_string(), message.into()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let mut err = AppError::validation("Validation failed");
        for (field, message) in self.errors {
            err = err.with_detail(field, message);
        }
        Err(err)
    }
}

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
                .with_detail("field", field),
        );
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Lowercase and trim an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Structural email check: `local@domain.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2 && !domain.starts_with('.') && !domain.contains("..")
}

/// Registration password rules: length, upper, lower and digit
pub fn password_problems(password: &str) -> Vec<String> {
    let mut problems = Vec::new();
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        problems.push(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if len > MAX_PASSWORD_LEN {
        problems.push(format!(
            "password must not exceed {MAX_PASSWORD_LEN} characters"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("password must contain at least one uppercase letter".into());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("password must contain at least one lowercase letter".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("password must contain at least one number".into());
    }
    problems
}

/// Fails with `PasswordTooWeak` listing every broken rule
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let problems = password_problems(password);
    if problems.is_empty() {
        return Ok(());
    }
    Err(AppError::new(ErrorCode::PasswordTooWeak).with_detail("password", problems))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("j.doe+shop@mail.example.ng"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("jane@example..com"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password_strength("Secret123").is_ok());
        assert_eq!(password_problems("short1A").len(), 1);
        assert_eq!(password_problems("alllowercase1").len(), 1);
        assert_eq!(password_problems("ALLUPPERCASE1").len(), 1);
        assert_eq!(password_problems("NoDigitsHere").len(), 1);

        let err = validate_password_strength("abc").unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordTooWeak);
        let details = err.details.unwrap();
        // too short, no uppercase, no digit
        assert_eq!(details["password"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Mug", "name", 10).is_ok());
        let err = validate_required_text("  ", "name", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let err = validate_required_text("a very long name", "name", 5).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_field_errors_collects_first_message_per_field() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());
        errors.add("email", "email is required");
        errors.add("email", "email is invalid");
        errors.add("first_name", "first_name is required");

        let err = errors.into_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details["email"], "email is required");
        assert_eq!(details["first_name"], "first_name is required");
    }
}
