//! Domain Layer
//!
//! Contains entities, value objects, and the directory trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{NewUser, User};
pub use repository::{LocalUserDirectory, UserDirectory};
