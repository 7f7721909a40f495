//! Token Pair Issuance

use platform::token::{TokenCodec, TokenKind, TokenSignError};

use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::value_object::{email::Email, user_id::UserId};

pub const TOKEN_TYPE: &str = "Bearer";

/// Public profile of a token owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Access and refresh token minted together for one subject
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always [`TOKEN_TYPE`]
    pub token_type: &'static str,
    pub user: UserProfile,
}

pub(crate) fn issue_access(
    codec: &TokenCodec,
    config: &AuthConfig,
    user_id: &UserId,
) -> Result<String, TokenSignError> {
    codec.encode(&user_id.to_string(), TokenKind::Access, config.access_token_ttl)
}

pub(crate) fn issue_pair(
    codec: &TokenCodec,
    config: &AuthConfig,
    user: &User,
) -> Result<TokenPair, TokenSignError> {
    let subject = user.user_id.to_string();

    Ok(TokenPair {
        access_token: codec.encode(&subject, TokenKind::Access, config.access_token_ttl)?,
        refresh_token: codec.encode(&subject, TokenKind::Refresh, config.refresh_token_ttl)?,
        token_type: TOKEN_TYPE,
        user: UserProfile::from(user),
    })
}
