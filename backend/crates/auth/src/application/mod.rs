//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
pub mod refresh;
pub mod sign_in;
pub mod sign_up;
pub mod tokens;

// Re-exports
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use refresh::RefreshUseCase;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use tokens::{TokenPair, UserProfile};
