//! User Password Value Object
//!
//! Domain wrappers over `platform::password`. bcrypt is CPU-bound, so the
//! async helpers move the work onto the blocking pool.

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError};
use std::fmt;

/// Raw password from user input. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Wrap input without checking it. Registration calls
    /// [`RawPassword::check_policy`] explicitly; sign-in never does.
    pub fn new(raw: String) -> Self {
        Self(ClearTextPassword::new(raw))
    }

    pub fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        self.0.check_policy()
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Stored bcrypt hash
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, cost: u32) -> Result<Self, PasswordHashError> {
        raw.inner().hash(cost).map(Self)
    }

    /// Hash on the blocking pool
    pub async fn hash_blocking(raw: RawPassword, cost: u32) -> Result<Self, PasswordHashError> {
        tokio::task::spawn_blocking(move || Self::from_raw(&raw, cost))
            .await
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
    }

    pub fn from_db(hash: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_stored(hash).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn verify(&self, raw: &RawPassword) -> bool {
        self.0.verify(raw.inner())
    }

    /// Verify on the blocking pool. `Err` only if the task itself failed.
    pub async fn verify_blocking(&self, raw: RawPassword) -> Result<bool, PasswordHashError> {
        let hashed = self.clone();
        tokio::task::spawn_blocking(move || hashed.verify(&raw))
            .await
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_policy_passthrough() {
        let raw = RawPassword::new("test1234!".to_string());
        assert_eq!(raw.check_policy(), Err(PasswordPolicyError::StartsCapital));
    }

    #[tokio::test]
    async fn test_hash_and_verify_blocking() {
        let hashed = UserPassword::hash_blocking(RawPassword::new("Test12@password".into()), TEST_COST)
            .await
            .unwrap();

        assert!(
            hashed
                .verify_blocking(RawPassword::new("Test12@password".into()))
                .await
                .unwrap()
        );
        assert!(
            !hashed
                .verify_blocking(RawPassword::new("Test12@Password".into()))
                .await
                .unwrap()
        );
    }

    #[test]
    fn test_from_db_roundtrip() {
        let raw = RawPassword::new("Test123@#".to_string());
        let hashed = UserPassword::from_raw(&raw, TEST_COST).unwrap();

        let restored = UserPassword::from_db(hashed.as_str()).unwrap();
        assert_eq!(restored, hashed);
        assert!(restored.verify(&raw));
        assert!(UserPassword::from_db("plaintext").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("Secret12!".to_string());
        assert!(!format!("{:?}", raw).contains("Secret"));

        let hashed = UserPassword::from_raw(&raw, TEST_COST).unwrap();
        assert!(!format!("{:?}", hashed).contains("$2"));
    }
}
