//! Auth Error Types
//!
//! One enum per operation, so each caller matches only what it can get.
//! Every enum knows its [`ErrorKind`]; [`ApiError`] is the single type the
//! HTTP layer returns and turns them into `kernel::AppError` responses.

use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordPolicyError;
use platform::token::TokenError;
use thiserror::Error;

const INTERNAL_DETAIL: &str = "Internal Server Error";

// ============================================================================
// Directory
// ============================================================================

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row that does not map back to a valid user
    #[error("Corrupt user record: {0}")]
    Corrupt(String),
}

// ============================================================================
// Session Issuer
// ============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email and wrong password alike
    #[error("Email or Password incorrect")]
    InvalidCredentials,

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials => ErrorKind::BadRequest,
            AuthError::Directory(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::InvalidCredentials => AppError::new(self.kind(), self.to_string()),
            _ => AppError::internal(INTERNAL_DETAIL),
        }
    }

    fn log(&self) {
        match self {
            AuthError::InvalidCredentials => tracing::warn!("Invalid login attempt"),
            AuthError::Directory(e) => tracing::error!(error = %e, "Sign-in directory error"),
            AuthError::Internal(msg) => tracing::error!(message = %msg, "Sign-in internal error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error(transparent)]
    PolicyViolation(#[from] PasswordPolicyError),

    #[error(transparent)]
    Directory(DirectoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DirectoryError> for RegisterError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateEmail => RegisterError::DuplicateEmail,
            other => RegisterError::Directory(other),
        }
    }
}

impl RegisterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegisterError::DuplicateEmail => ErrorKind::Conflict,
            RegisterError::PolicyViolation(_) => ErrorKind::BadRequest,
            RegisterError::Directory(_) | RegisterError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            RegisterError::DuplicateEmail => AppError::new(self.kind(), self.to_string())
                .with_action("Log in instead, or register with another email"),
            RegisterError::PolicyViolation(_) => AppError::new(self.kind(), self.to_string()),
            _ => AppError::internal(INTERNAL_DETAIL),
        }
    }

    fn log(&self) {
        match self {
            RegisterError::Directory(e) => {
                tracing::error!(error = %e, "Registration directory error")
            }
            RegisterError::Internal(msg) => {
                tracing::error!(message = %msg, "Registration internal error")
            }
            _ => tracing::debug!(error = %self, "Registration rejected"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Invalid token type")]
    WrongTokenKind,

    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RefreshError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RefreshError::Token(_) => ErrorKind::Forbidden,
            RefreshError::WrongTokenKind => ErrorKind::Unauthorized,
            RefreshError::UserNotFound => ErrorKind::NotFound,
            RefreshError::Directory(_) | RefreshError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            RefreshError::Token(e) => token_app_error(e),
            RefreshError::WrongTokenKind | RefreshError::UserNotFound => {
                AppError::new(self.kind(), self.to_string())
            }
            _ => AppError::internal(INTERNAL_DETAIL),
        }
    }

    fn log(&self) {
        match self {
            RefreshError::Directory(e) => tracing::error!(error = %e, "Refresh directory error"),
            RefreshError::Internal(msg) => {
                tracing::error!(message = %msg, "Refresh internal error")
            }
            _ => tracing::warn!(error = %self, "Refresh rejected"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Invalid token type")]
    WrongTokenKind,

    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl AccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::Token(_) => ErrorKind::Forbidden,
            AccessError::WrongTokenKind => ErrorKind::Unauthorized,
            AccessError::UserNotFound => ErrorKind::NotFound,
            AccessError::Directory(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            AccessError::Token(e) => token_app_error(e),
            AccessError::Directory(_) => AppError::internal(INTERNAL_DETAIL),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AccessError::Directory(e) => tracing::error!(error = %e, "Access directory error"),
            _ => tracing::warn!(error = %self, "Access token rejected"),
        }
    }
}

/// 403 with the user-facing wording for each codec failure
fn token_app_error(err: &TokenError) -> AppError {
    let detail = match err {
        TokenError::Expired => "Your token has expired. Please log in again.",
        TokenError::Malformed => "Error when decoding the token. Please check your request.",
        TokenError::MissingClaim(_) => {
            "There is no required field in your token. Please contact the administrator."
        }
    };
    AppError::forbidden(detail)
}

// ============================================================================
// HTTP-facing error
// ============================================================================

/// Everything a handler or middleware can fail with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Register(#[from] RegisterError),

    #[error(transparent)]
    Refresh(#[from] RefreshError),

    #[error(transparent)]
    Access(#[from] AccessError),

    /// Request body failed schema checks
    #[error("{0}")]
    Validation(String),

    /// Bad credentials on the OAuth2 password flow, which words them
    /// differently from `/login`
    #[error("Incorrect email or password")]
    IncorrectPasswordGrant,

    #[error("Token not found")]
    MissingToken,

    #[error("Too many requests")]
    RateLimited { retry_after_secs: i64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Auth(e) => e.kind(),
            ApiError::Register(e) => e.kind(),
            ApiError::Refresh(e) => e.kind(),
            ApiError::Access(e) => e.kind(),
            ApiError::Validation(_) => ErrorKind::UnprocessableEntity,
            ApiError::IncorrectPasswordGrant => ErrorKind::BadRequest,
            ApiError::MissingToken => ErrorKind::Unauthorized,
            ApiError::RateLimited { .. } => ErrorKind::TooManyRequests,
            ApiError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            ApiError::Auth(e) => e.to_app_error(),
            ApiError::Register(e) => e.to_app_error(),
            ApiError::Refresh(e) => e.to_app_error(),
            ApiError::Access(e) => e.to_app_error(),
            ApiError::Validation(msg) => AppError::unprocessable(msg.clone()),
            ApiError::IncorrectPasswordGrant => AppError::bad_request(self.to_string()),
            ApiError::MissingToken => {
                AppError::unauthorized("Token not found").with_action("Log in to obtain a token")
            }
            ApiError::RateLimited { .. } => AppError::too_many_requests("Too many requests"),
            ApiError::Internal(_) => AppError::internal(INTERNAL_DETAIL),
        }
    }

    fn log(&self) {
        match self {
            ApiError::Auth(e) => e.log(),
            ApiError::Register(e) => e.log(),
            ApiError::Refresh(e) => e.log(),
            ApiError::Access(e) => e.log(),
            ApiError::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Rate limit exceeded")
            }
            ApiError::Internal(msg) => tracing::error!(message = %msg, "Internal error"),
            ApiError::IncorrectPasswordGrant => tracing::warn!("Invalid login attempt"),
            _ => tracing::debug!(error = %self, "Request rejected"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let mut response = self.to_app_error().into_response();

        if let ApiError::RateLimited { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}
