//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, directory trait
//! - `application/` - Use cases (sign up, sign in, refresh, current user)
//! - `infra/` - PostgreSQL and in-memory directories
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Registration with a password strength policy
//! - Email + password sign-in issuing an access/refresh JWT pair
//! - Stateless refresh: a refresh token buys a new access token
//! - `HttpOnly` token cookies, or `Authorization: Bearer` for the access token
//!
//! ## Security Model
//! - Passwords hashed with bcrypt, cleartext zeroized on drop
//! - HS256 tokens, nothing stored server-side, no revocation
//! - Unknown email and wrong password are indistinguishable to the client
//! - Registration throttled per client IP

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use error::{AccessError, ApiError, AuthError, DirectoryError, RefreshError, RegisterError};
pub use infra::{InMemoryUserDirectory, PgUserDirectory};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
