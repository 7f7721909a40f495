//! Email Value Object
//!
//! Addresses are compared exactly as stored. Surrounding whitespace is
//! trimmed, case is kept.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_string();

        match email.len() {
            0 => return Err(AppError::bad_request("Email cannot be empty")),
            n if n > EMAIL_MAX_LENGTH => {
                return Err(AppError::bad_request(format!(
                    "Email must be at most {EMAIL_MAX_LENGTH} characters"
                )));
            }
            _ => {}
        }

        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| AppError::bad_request("Email must contain '@'"))?;

        if !local_part_ok(local) || !domain_ok(domain) {
            return Err(AppError::bad_request("Invalid email format"));
        }

        Ok(Self(email))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

fn local_part_ok(local: &str) -> bool {
    !local.is_empty()
        && local.len() <= LOCAL_PART_MAX_LENGTH
        && !local.chars().any(char::is_whitespace)
}

/// At least two dot-separated labels of ASCII letters, digits and inner
/// hyphens. A second '@' lands here and fails.
fn domain_ok(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("user@example.com").is_ok());
        assert!(Email::new("user.name@example.co.jp").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("   ").is_err());
        assert!(Email::new("userexample.com").is_err());
        assert!(Email::new("user@").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@@example.com").is_err());
        assert!(Email::new("user@example").is_err());
        assert!(Email::new("user@example..com").is_err());
        assert!(Email::new("us er@example.com").is_err());
    }

    #[test]
    fn test_email_domain_labels() {
        assert!(Email::new("user@mail-1.example.com").is_ok());
        assert!(Email::new("user@-mail.example.com").is_err());
        assert!(Email::new("user@mail-.example.com").is_err());
        assert!(Email::new("user@exa_mple.com").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let local = "a".repeat(65);
        assert!(Email::new(format!("{local}@example.com")).is_err());
        let domain = format!("{}.com", "a".repeat(250));
        assert!(Email::new(format!("u@{domain}")).is_err());
    }

    #[test]
    fn test_email_keeps_case() {
        let email = Email::new("  Lira@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "Lira@Example.COM");
        assert_ne!(email, Email::new("lira@example.com").unwrap());
    }
}
