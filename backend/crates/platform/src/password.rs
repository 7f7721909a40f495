//! Password Policy, Hashing and Verification
//!
//! - Registration policy: capital first letter, two digits, one symbol
//! - bcrypt hashing with the salt embedded in the stored string
//! - Zeroization of cleartext on drop
//!
//! Length limits (8-20 characters) belong to request validation and are
//! exported here only so callers share the numbers.

use std::fmt;

use bcrypt::HashParts;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MAX_PASSWORD_LENGTH: usize = 20;

/// Characters that satisfy the "special symbol" rule
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};'\":\\|,.<>/?";

/// bcrypt work factor used when none is configured
pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;

// ============================================================================
// Error Types
// ============================================================================

/// The first policy rule a password breaks.
///
/// Rules are checked in declaration order and checking stops at the first
/// failure, so a password breaking several rules reports the earliest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must start with a capital letter")]
    StartsCapital,

    #[error("Password must contain at least 2 digits")]
    TwoDigits,

    #[error("Password must contain at least 1 special symbol from the specified set")]
    SpecialChar,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Policy
// ============================================================================

/// Check a registration password against the strength policy.
pub fn validate_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if !password.chars().next().is_some_and(char::is_uppercase) {
        return Err(PasswordPolicyError::StartsCapital);
    }

    // Any Unicode digit counts, not only ASCII
    if password.chars().filter(|c| c.is_numeric()).count() < 2 {
        return Err(PasswordPolicyError::TwoDigits);
    }

    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(PasswordPolicyError::SpecialChar);
    }

    Ok(())
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Cleartext password, erased from memory when dropped.
///
/// Not `Clone`, and `Debug` never prints the content.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Wrap user input as-is. Policy is a separate step because sign-in
    /// must accept any input.
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    pub fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        validate_policy(&self.0)
    }

    /// Length in characters, not bytes
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with bcrypt at the given cost (4..=31).
    pub fn hash(&self, cost: u32) -> Result<HashedPassword, PasswordHashError> {
        let hash = bcrypt::hash(self.as_bytes(), cost)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword { hash })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// bcrypt hash in modular crypt format (`$2b$<cost>$<salt+hash>`).
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Load a stored hash, rejecting strings bcrypt cannot parse
    pub fn from_stored(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        hash.parse::<HashParts>()
            .map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Work factor recorded in the hash
    pub fn cost(&self) -> Option<u32> {
        self.hash.parse::<HashParts>().ok().map(|p| p.get_cost())
    }

    /// bcrypt compares digests in constant time. A hash that fails to
    /// parse never matches.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        bcrypt::verify(password.as_bytes(), &self.hash).unwrap_or(false)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_policy_accepts_valid_passwords() {
        assert_eq!(validate_policy("Test12@password"), Ok(()));
        assert_eq!(validate_policy("Test123@#"), Ok(()));
        assert_eq!(validate_policy("A1b2?"), Ok(()));
    }

    #[test]
    fn test_policy_starts_capital() {
        assert_eq!(
            validate_policy("test1234!"),
            Err(PasswordPolicyError::StartsCapital)
        );
        assert_eq!(
            validate_policy("1Test234!"),
            Err(PasswordPolicyError::StartsCapital)
        );
        assert_eq!(validate_policy(""), Err(PasswordPolicyError::StartsCapital));
    }

    #[test]
    fn test_policy_two_digits() {
        assert_eq!(
            validate_policy("Testpass1!"),
            Err(PasswordPolicyError::TwoDigits)
        );
        assert_eq!(
            validate_policy("Testpass!!"),
            Err(PasswordPolicyError::TwoDigits)
        );
    }

    #[test]
    fn test_policy_counts_non_ascii_digits() {
        assert_eq!(validate_policy("Test\u{0661}\u{0662}@pw"), Ok(()));
        assert_eq!(validate_policy("Test1\u{0967}@pw"), Ok(()));
        assert_eq!(
            validate_policy("Test\u{0661}@pw"),
            Err(PasswordPolicyError::TwoDigits)
        );
    }

    #[test]
    fn test_policy_special_char() {
        assert_eq!(
            validate_policy("Testpass12"),
            Err(PasswordPolicyError::SpecialChar)
        );
        // Symbols outside the set do not count
        assert_eq!(
            validate_policy("Testpass12~`"),
            Err(PasswordPolicyError::SpecialChar)
        );
    }

    #[test]
    fn test_policy_reports_first_failure_only() {
        // Breaks all three rules
        assert_eq!(
            validate_policy("password"),
            Err(PasswordPolicyError::StartsCapital)
        );
        // Breaks digits and symbol rules
        assert_eq!(
            validate_policy("Password"),
            Err(PasswordPolicyError::TwoDigits)
        );
    }

    #[test]
    fn test_every_listed_symbol_counts() {
        for symbol in SPECIAL_CHARACTERS.chars() {
            let candidate = format!("Test12{symbol}");
            assert_eq!(validate_policy(&candidate), Ok(()), "symbol {symbol:?}");
        }
    }

    #[test]
    fn test_non_ascii_capital_accepted() {
        assert_eq!(validate_policy("Élan12!x"), Ok(()));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("Test12@password".to_string());
        let hashed = password.hash(TEST_COST).unwrap();

        assert_ne!(hashed.as_str(), "Test12@password");
        assert!(hashed.as_str().starts_with("$2"));
        assert!(hashed.verify(&password));

        let wrong = ClearTextPassword::new("Test12@passwore".to_string());
        assert!(!hashed.verify(&wrong));
    }

    #[test]
    fn test_hash_is_salted() {
        let password = ClearTextPassword::new("Test12@password".to_string());
        let first = password.hash(TEST_COST).unwrap();
        let second = password.hash(TEST_COST).unwrap();

        assert_ne!(first, second);
        assert!(first.verify(&password));
        assert!(second.verify(&password));
    }

    #[test]
    fn test_stored_roundtrip_and_cost() {
        let password = ClearTextPassword::new("Test123@#".to_string());
        let hashed = password.hash(TEST_COST).unwrap();

        let restored = HashedPassword::from_stored(hashed.as_str().to_string()).unwrap();
        assert!(restored.verify(&password));
        assert_eq!(restored.cost(), Some(TEST_COST));
    }

    #[test]
    fn test_invalid_stored_hash() {
        assert!(matches!(
            HashedPassword::from_stored("not_a_valid_hash"),
            Err(PasswordHashError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_hash_rejects_bad_cost() {
        let password = ClearTextPassword::new("Test123@#".to_string());
        assert!(matches!(
            password.hash(2),
            Err(PasswordHashError::HashingFailed(_))
        ));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("Secret12!".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("Secret"));

        let hashed = password.hash(TEST_COST).unwrap();
        assert!(!format!("{:?}", hashed).contains("$2"));
    }
}
