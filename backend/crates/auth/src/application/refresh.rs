//! Refresh Use Case
//!
//! Trades a refresh token for a new access token. The refresh token itself
//! is not rotated and stays valid until its own expiry.

use std::sync::Arc;

use platform::token::{TokenCodec, TokenError, TokenKind};

use crate::application::config::AuthConfig;
use crate::application::tokens::issue_access;
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::user_id::UserId;
use crate::error::RefreshError;

/// Refresh use case
pub struct RefreshUseCase<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<D> RefreshUseCase<D>
where
    D: UserDirectory,
{
    pub fn new(directory: Arc<D>, codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self {
            directory,
            codec,
            config,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> Result<String, RefreshError> {
        let claims = self.codec.decode(refresh_token)?;

        if claims.kind != TokenKind::Refresh {
            return Err(RefreshError::WrongTokenKind);
        }

        let user_id: UserId = claims
            .subject
            .parse()
            .map_err(|_| RefreshError::Token(TokenError::Malformed))?;

        let user = self
            .directory
            .find_by_id(&user_id)
            .await?
            .ok_or(RefreshError::UserNotFound)?;

        let access_token = issue_access(&self.codec, &self.config, &user.user_id)
            .map_err(|e| RefreshError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.user_id, "Access token refreshed");

        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use chrono::TimeDelta;

    #[tokio::test]
    async fn test_refresh_mints_access_for_same_subject() {
        let harness = Harness::new();
        let pair = harness.register("Lira", "test@example.com", "Test12@password").await.unwrap();

        let access = harness.refresh().execute(&pair.refresh_token).await.unwrap();

        let claims = harness.codec.decode(&access).unwrap();
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.subject, pair.user.id.to_string());
    }

    #[tokio::test]
    async fn test_refresh_token_is_reusable() {
        let harness = Harness::new();
        let pair = harness.register("Lira", "test@example.com", "Test12@password").await.unwrap();

        assert!(harness.refresh().execute(&pair.refresh_token).await.is_ok());
        assert!(harness.refresh().execute(&pair.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_access_token_is_wrong_kind() {
        let harness = Harness::new();
        let pair = harness.register("Lira", "test@example.com", "Test12@password").await.unwrap();

        let err = harness.refresh().execute(&pair.access_token).await.unwrap_err();
        assert!(matches!(err, RefreshError::WrongTokenKind));
    }

    #[tokio::test]
    async fn test_codec_errors_pass_through() {
        let harness = Harness::new();
        let pair = harness.register("Lira", "test@example.com", "Test12@password").await.unwrap();

        let err = harness.refresh().execute("garbage").await.unwrap_err();
        assert!(matches!(err, RefreshError::Token(TokenError::Malformed)));

        harness.clock.advance(TimeDelta::days(100));
        let err = harness.refresh().execute(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, RefreshError::Token(TokenError::Expired)));
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let harness = Harness::new();
        let orphan = harness
            .codec
            .encode(&UserId::new().to_string(), TokenKind::Refresh, TimeDelta::hours(1))
            .unwrap();

        let err = harness.refresh().execute(&orphan).await.unwrap_err();
        assert!(matches!(err, RefreshError::UserNotFound));
    }

    #[tokio::test]
    async fn test_non_uuid_subject_is_malformed() {
        let harness = Harness::new();
        let token = harness
            .codec
            .encode("42", TokenKind::Refresh, TimeDelta::hours(1))
            .unwrap();

        let err = harness.refresh().execute(&token).await.unwrap_err();
        assert!(matches!(err, RefreshError::Token(TokenError::Malformed)));
    }
}
