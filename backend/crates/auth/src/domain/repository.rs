//! Repository Traits
//!
//! Interfaces for user persistence. Implementations live in `infra`.

use crate::domain::entity::{NewUser, User};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::DirectoryError;

/// User directory
///
/// `insert` must enforce email uniqueness atomically: of two concurrent
/// inserts with the same email exactly one succeeds, the other gets
/// [`DirectoryError::DuplicateEmail`].
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    /// Exact match on the stored email
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DirectoryError>;

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, DirectoryError>;

    async fn insert(&self, user: NewUser) -> Result<User, DirectoryError>;
}
