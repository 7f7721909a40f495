//! Shared fixtures for use case and router tests

use std::sync::Arc;

use platform::clock::ManualClock;
use platform::rate_limit::InMemoryRateLimitStore;
use platform::token::TokenCodec;

use crate::application::config::{AuthConfig, SigningKey};
use crate::application::{
    CurrentUserUseCase, RefreshUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
    TokenPair,
};
use crate::domain::entity::{NewUser, User};
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, RegisterError};
use crate::infra::InMemoryUserDirectory;
use crate::presentation::AuthAppState;

pub(crate) const TEST_KEY: &str = "an-hs256-test-secret-of-32-bytes!";

/// Default config with the cheapest bcrypt cost
pub(crate) fn test_config() -> AuthConfig {
    AuthConfig {
        password_hash_cost: 4,
        ..AuthConfig::new(SigningKey::new(TEST_KEY))
    }
}

pub(crate) struct Harness {
    pub directory: Arc<InMemoryUserDirectory>,
    pub codec: Arc<TokenCodec>,
    pub config: Arc<AuthConfig>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AuthConfig) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = TokenCodec::new(config.signing_key.as_bytes(), clock.clone());

        Self {
            directory: Arc::new(InMemoryUserDirectory::new()),
            codec: Arc::new(codec),
            config: Arc::new(config),
            clock,
        }
    }

    pub fn sign_up(&self) -> SignUpUseCase<InMemoryUserDirectory> {
        SignUpUseCase::new(self.directory.clone(), self.codec.clone(), self.config.clone())
    }

    pub fn sign_in(&self) -> SignInUseCase<InMemoryUserDirectory> {
        SignInUseCase::new(self.directory.clone(), self.codec.clone(), self.config.clone())
    }

    pub fn refresh(&self) -> RefreshUseCase<InMemoryUserDirectory> {
        RefreshUseCase::new(self.directory.clone(), self.codec.clone(), self.config.clone())
    }

    pub fn current_user(&self) -> CurrentUserUseCase<InMemoryUserDirectory> {
        CurrentUserUseCase::new(self.directory.clone(), self.codec.clone())
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, RegisterError> {
        self.sign_up()
            .execute(SignUpInput {
                name: name.to_string(),
                email: Email::new(email).unwrap(),
                password: password.to_string(),
            })
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        self.sign_in()
            .execute(SignInInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    /// Store a user directly, skipping the password policy
    pub async fn insert_user(&self, name: &str, email: &str, password: &str) -> User {
        let password_hash = UserPassword::from_raw(
            &RawPassword::new(password.to_string()),
            self.config.password_hash_cost,
        )
        .unwrap();

        self.directory
            .insert(NewUser {
                name: name.to_string(),
                email: Email::new(email).unwrap(),
                password_hash,
            })
            .await
            .unwrap()
    }

    pub fn state(&self) -> AuthAppState<InMemoryUserDirectory> {
        AuthAppState {
            directory: self.directory.clone(),
            codec: self.codec.clone(),
            config: self.config.clone(),
            rate_limiter: InMemoryRateLimitStore::new(self.clock.clone()),
        }
    }
}
