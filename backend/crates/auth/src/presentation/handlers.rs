//! HTTP Handlers

use axum::extract::{Extension, Form, State};
use axum::http::{HeaderMap, header};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use std::sync::Arc;

use platform::clock::Clock;
use platform::cookie::{CookieConfig, extract_cookie};
use platform::rate_limit::InMemoryRateLimitStore;
use platform::token::TokenCodec;

use crate::application::config::AuthConfig;
use crate::application::{
    RefreshUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase, TokenPair,
};
use crate::domain::repository::UserDirectory;
use crate::error::{ApiError, ApiResult, AuthError};
use crate::presentation::dto::{
    AccessTokenForm, AccessTokenResponse, LoginRequest, MessageResponse, RegisterRequest,
    TokenResponse, UserInfoResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<D>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    pub directory: Arc<D>,
    pub codec: Arc<TokenCodec>,
    pub config: Arc<AuthConfig>,
    /// Per-IP counter for `/register`
    pub rate_limiter: InMemoryRateLimitStore,
}

impl<D> AuthAppState<D>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    pub fn new(directory: D, config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let codec = TokenCodec::new(config.signing_key.as_bytes(), clock.clone());

        Self {
            directory: Arc::new(directory),
            codec: Arc::new(codec),
            config: Arc::new(config),
            rate_limiter: InMemoryRateLimitStore::new(clock),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<D>(
    State(state): State<AuthAppState<D>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let email = req.validate()?;

    let use_case = SignUpUseCase::new(
        state.directory.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let pair = use_case
        .execute(SignUpInput {
            name: req.name,
            email,
            password: req.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: pair.access_token,
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<D>(
    State(state): State<AuthAppState<D>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let pair = sign_in(&state, req.email, req.password).await?;
    let cookies = token_pair_cookies(&state.config, &pair);

    Ok((
        cookies,
        Json(TokenResponse {
            token: pair.access_token,
        }),
    ))
}

/// POST /auth/access-token
///
/// OAuth2 password flow for clients that speak it.
pub async fn access_token<D>(
    State(state): State<AuthAppState<D>>,
    Form(form): Form<AccessTokenForm>,
) -> ApiResult<impl IntoResponse>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let pair = sign_in(&state, form.username, form.password)
        .await
        .map_err(|e| match e {
            ApiError::Auth(AuthError::InvalidCredentials) => ApiError::IncorrectPasswordGrant,
            other => other,
        })?;
    let cookies = token_pair_cookies(&state.config, &pair);

    Ok((
        cookies,
        Json(AccessTokenResponse {
            access_token: pair.access_token,
            token_type: "bearer".to_string(),
        }),
    ))
}

async fn sign_in<D>(
    state: &AuthAppState<D>,
    email: String,
    password: String,
) -> ApiResult<TokenPair>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.directory.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    Ok(use_case.execute(SignInInput { email, password }).await?)
}

// ============================================================================
// Refresh
// ============================================================================

/// GET /auth/refresh
pub async fn refresh<D>(
    State(state): State<AuthAppState<D>>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let refresh_token = extract_cookie(&headers, &state.config.refresh_cookie_name)
        .ok_or(ApiError::MissingToken)?;

    let use_case = RefreshUseCase::new(
        state.directory.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let access_token = use_case.execute(&refresh_token).await?;
    let cookie = access_cookie(&state.config).build_set_cookie(&access_token);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(TokenResponse {
            token: access_token,
        }),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
///
/// Tokens stay valid until they expire; only the cookies go away.
pub async fn logout<D>(State(state): State<AuthAppState<D>>) -> impl IntoResponse
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let config = &state.config;

    (
        AppendHeaders([
            (header::SET_COOKIE, access_cookie(config).build_delete_cookie()),
            (header::SET_COOKIE, refresh_cookie(config).build_delete_cookie()),
        ]),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

// ============================================================================
// Current User (requires authentication)
// ============================================================================

/// GET /auth/me
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserInfoResponse> {
    Json(UserInfoResponse::from(&user))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn access_cookie(config: &AuthConfig) -> CookieConfig {
    token_cookie(config, &config.access_cookie_name)
        .max_age_secs(config.access_token_ttl.num_seconds())
}

fn refresh_cookie(config: &AuthConfig) -> CookieConfig {
    token_cookie(config, &config.refresh_cookie_name)
        .max_age_secs(config.refresh_token_ttl.num_seconds())
}

fn token_cookie(config: &AuthConfig, name: &str) -> CookieConfig {
    CookieConfig {
        same_site: config.cookie_same_site,
        ..CookieConfig::new(name)
    }
    .secure(config.cookie_secure)
}

fn token_pair_cookies(
    config: &AuthConfig,
    pair: &TokenPair,
) -> AppendHeaders<[(header::HeaderName, String); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            access_cookie(config).build_set_cookie(&pair.access_token),
        ),
        (
            header::SET_COOKIE,
            refresh_cookie(config).build_set_cookie(&pair.refresh_token),
        ),
    ])
}
