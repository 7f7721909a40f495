//! Sign In Use Case
//!
//! Checks email and password and issues a token pair.

use std::sync::Arc;

use platform::token::TokenCodec;

use crate::application::config::AuthConfig;
use crate::application::tokens::{TokenPair, issue_pair};
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::AuthError;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<D> SignInUseCase<D>
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

    /// Unknown email, malformed email and wrong password all end in
    /// [`AuthError::InvalidCredentials`].
    pub async fn execute(&self, input: SignInInput) -> Result<TokenPair, AuthError> {
        let Ok(email) = Email::new(input.email) else {
            return Err(AuthError::InvalidCredentials);
        };
        let raw_password = RawPassword::new(input.password);

        let Some(user) = self.directory.find_by_email(&email).await? else {
            tracing::debug!("Sign-in for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let password_valid = user
            .password_hash
            .verify_blocking(raw_password)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !password_valid {
            tracing::debug!(user_id = %user.user_id, "Sign-in with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = issue_pair(&self.codec, &self.config, &user)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(pair)
    }
}
