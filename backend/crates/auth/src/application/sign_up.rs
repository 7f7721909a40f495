//! Sign Up Use Case
//!
//! Creates a user and hands back a fresh token pair.

use std::sync::Arc;

use platform::token::TokenCodec;

use crate::application::config::AuthConfig;
use crate::application::tokens::{TokenPair, issue_pair};
use crate::domain::entity::NewUser;
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::RegisterError;

/// Sign up input. Length and format checks have already passed.
pub struct SignUpInput {
    pub name: String,
    pub email: Email,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<D> SignUpUseCase<D>
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

    pub async fn execute(&self, input: SignUpInput) -> Result<TokenPair, RegisterError> {
        let raw_password = RawPassword::new(input.password);
        raw_password.check_policy()?;

        // Fast path only. The insert below is what actually guarantees uniqueness.
        if self.directory.find_by_email(&input.email).await?.is_some() {
            return Err(RegisterError::DuplicateEmail);
        }

        let password_hash =
            UserPassword::hash_blocking(raw_password, self.config.password_hash_cost)
                .await
                .map_err(|e| RegisterError::Internal(e.to_string()))?;

        let user = self
            .directory
            .insert(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        let pair = issue_pair(&self.codec, &self.config, &user)
            .map_err(|e| RegisterError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.user_id, "User registered");

        Ok(pair)
    }
}
