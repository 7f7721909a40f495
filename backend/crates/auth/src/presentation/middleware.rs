//! Auth Middleware
//!
//! - `require_access_token`: guards routes that need a signed-in user
//! - `limit_registrations`: per-client-IP throttle for `/register`

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;

use platform::client::extract_client_ip;
use platform::clock::Clock;
use platform::cookie::{extract_bearer, extract_cookie};
use platform::rate_limit::RateLimitStore;

use crate::application::CurrentUserUseCase;
use crate::domain::entity::User;
use crate::domain::repository::UserDirectory;
use crate::error::ApiError;
use crate::presentation::handlers::AuthAppState;

/// Authenticated user, inserted into request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that requires a valid access token.
///
/// The `Authorization: Bearer` header wins over the access-token cookie.
pub async fn require_access_token<D>(
    State(state): State<AuthAppState<D>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let token = extract_bearer(req.headers())
        .or_else(|| extract_cookie(req.headers(), &state.config.access_cookie_name))
        .ok_or(ApiError::MissingToken)?;

    let use_case = CurrentUserUseCase::new(state.directory.clone(), state.codec.clone());
    let user = use_case.execute(&token).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Middleware that counts requests per client IP and rejects the excess
/// with 429. The peer address is the key unless the config trusts
/// `X-Forwarded-For`.
pub async fn limit_registrations<D>(
    State(state): State<AuthAppState<D>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    let key = extract_client_ip(req.headers(), direct_ip, state.config.trust_forwarded_for)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let decision = state
        .rate_limiter
        .check_and_increment(&key, &state.config.register_rate_limit)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if !decision.allowed {
        return Err(ApiError::RateLimited {
            retry_after_secs: decision.retry_after_secs(state.rate_limiter.clock().now()),
        });
    }

    Ok(next.run(req).await)
}
