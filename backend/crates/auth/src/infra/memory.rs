//! In-Memory User Directory
//!
//! For tests and local runs without a database. Data lives as long as the
//! process.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::entity::{NewUser, User};
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::DirectoryError;

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn remove(&self, user_id: &UserId) -> Option<User> {
        self.users.write().await.remove(user_id)
    }
}

impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DirectoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, DirectoryError> {
        // Check and insert under one write lock
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DirectoryError::DuplicateEmail);
        }

        let user = user.into_user(Utc::now());
        users.insert(user.user_id, user.clone());

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::{RawPassword, UserPassword};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Lira".to_string(),
            email: Email::new(email).unwrap(),
            password_hash: UserPassword::from_raw(&RawPassword::new("Test12@password".into()), 4)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.insert(new_user("test@example.com")).await.unwrap();

        let by_id = directory.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(by_id.email, user.email);

        let by_email = directory.find_by_email(&user.email).await.unwrap().unwrap();
        assert_eq!(by_email.user_id, user.user_id);

        assert!(
            directory
                .find_by_id(&UserId::new())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(new_user("test@example.com")).await.unwrap();

        let err = directory.insert(new_user("test@example.com")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateEmail));
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.insert(new_user("test@example.com")).await.unwrap();

        assert!(directory.remove(&user.user_id).await.is_some());
        assert!(directory.is_empty().await);
    }
}
