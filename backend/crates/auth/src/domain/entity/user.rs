//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};

/// Registered user with their stored credential
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    /// Unique across the directory
    pub email: Email,
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
}

/// User about to be inserted. The directory assigns nothing itself:
/// id and timestamp are fixed by [`NewUser::into_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: UserPassword,
}

impl NewUser {
    pub fn into_user(self, created_at: DateTime<Utc>) -> User {
        User {
            user_id: UserId::new(),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at,
        }
    }
}
