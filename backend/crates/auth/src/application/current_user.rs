//! Current User Use Case
//!
//! Resolves the bearer of an access token to a stored user.

use std::sync::Arc;

use platform::token::{TokenCodec, TokenError, TokenKind};

use crate::domain::entity::User;
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::user_id::UserId;
use crate::error::AccessError;

/// Current user use case
pub struct CurrentUserUseCase<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    codec: Arc<TokenCodec>,
}

impl<D> CurrentUserUseCase<D>
where
    D: UserDirectory,
{
    pub fn new(directory: Arc<D>, codec: Arc<TokenCodec>) -> Self {
        Self { directory, codec }
    }

    /// Refresh tokens are refused here
    pub async fn execute(&self, access_token: &str) -> Result<User, AccessError> {
        let claims = self.codec.decode(access_token)?;

        if claims.kind != TokenKind::Access {
            return Err(AccessError::WrongTokenKind);
        }

        let user_id: UserId = claims
            .subject
            .parse()
            .map_err(|_| AccessError::Token(TokenError::Malformed))?;

        self.directory
            .find_by_id(&user_id)
            .await?
            .ok_or(AccessError::UserNotFound)
    }
}
