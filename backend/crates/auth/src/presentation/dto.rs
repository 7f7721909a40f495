//! API DTOs (Data Transfer Objects)

use platform::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use serde::{Deserialize, Serialize};

use crate::application::UserProfile;
use crate::domain::entity::User;
use crate::domain::value_object::email::Email;
use crate::error::ApiError;

pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 20;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Schema checks that run before the password policy. Returns the
    /// parsed email.
    pub fn validate(&self) -> Result<Email, ApiError> {
        let name_len = self.name.chars().count();
        if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&name_len) {
            return Err(ApiError::Validation(format!(
                "name must be between {} and {} characters",
                MIN_NAME_LENGTH, MAX_NAME_LENGTH
            )));
        }

        let email = Email::new(self.email.as_str())
            .map_err(|e| ApiError::Validation(format!("email: {}", e.message())))?;

        let password_len = self.password.chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password_len) {
            return Err(ApiError::Validation(format!(
                "password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }

        Ok(email)
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// OAuth2 password-flow form. The `username` field carries the email.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenForm {
    #[serde(default)]
    pub grant_type: Option<String>,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub scope: String,
}

// ============================================================================
// Responses
// ============================================================================

/// `{"Token": "<access token>"}`
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    #[serde(rename = "Token")]
    pub token: String,
}

/// OAuth2 token response
#[derive(Debug, Clone, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Current user info response
#[derive(Debug, Clone, Serialize)]
pub struct UserInfoResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserInfoResponse {
    fn from(user: &User) -> Self {
        UserProfile::from(user).into()
    }
}

impl From<UserProfile> for UserInfoResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            name: profile.name,
            email: profile.email.into_db(),
        }
    }
}
