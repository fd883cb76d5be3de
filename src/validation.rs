// src/validation.rs
use crate::error::{ApiError, ApiResult};
use regex::Regex;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
    });
    re.is_match(email)
}

/// Trimmed value, or a 400 carrying `message` when blank.
pub fn required(value: &str, message: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Blank optional strings are stored as absent.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("agent1@company.com"));
        assert!(!is_valid_email("agent1company.com"));
        assert!(!is_valid_email("agent1@company"));
        assert!(!is_valid_email("a b@company.com"));
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("  An ", "name").unwrap(), "An");
        assert!(matches!(required("   ", "name"), Err(ApiError::Validation(m)) if m == "name"));
    }

    #[test]
    fn test_optional_drops_blank() {
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(Some(" HCM ".into())), Some("HCM".to_string()));
        assert_eq!(optional(None), None);
    }
}
