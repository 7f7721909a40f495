//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use platform::clock::SystemClock;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserDirectory;
use crate::infra::postgres::PgUserDirectory;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{limit_registrations, require_access_token};

/// Create the Auth router with the PostgreSQL directory
pub fn auth_router(directory: PgUserDirectory, config: AuthConfig) -> Router {
    auth_router_generic(directory, config)
}

/// Create the Auth router for any directory implementation
pub fn auth_router_generic<D>(directory: D, config: AuthConfig) -> Router
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    auth_router_with_state(AuthAppState::new(directory, config, Arc::new(SystemClock)))
}

/// Create the Auth router from prepared state
pub fn auth_router_with_state<D>(state: AuthAppState<D>) -> Router
where
    D: UserDirectory + Clone + Send + Sync + 'static,
{
    let register = Router::new()
        .route("/register", post(handlers::register::<D>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limit_registrations::<D>,
        ));

    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token::<D>,
        ));

    Router::new()
        .route("/login", post(handlers::login::<D>))
        .route("/access-token", post(handlers::access_token::<D>))
        .route("/refresh", get(handlers::refresh::<D>))
        .route("/logout", post(handlers::logout::<D>))
        .merge(register)
        .merge(protected)
        .with_state(state)
}
