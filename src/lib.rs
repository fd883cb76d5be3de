// lib.rs - live-chat support backend: widget endpoints, agent dashboard API, in-memory store
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{Extension, Router};
use config::Config;
use middleware::rate_limit::RateLimiter;
use std::sync::Arc;
use storage::MemoryStore;
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub store: MemoryStore,
    pub config: Config,
    pub login_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let login_limiter = RateLimiter::new(config.login_rate_limit, config.login_rate_window_secs);
        Self {
            store: MemoryStore::new(),
            config,
            login_limiter,
        }
    }

    /// Builds the state and, when enabled, seeds the demo agents and pre-chat form.
    pub async fn initialize(config: Config) -> Result<Self, bcrypt::BcryptError> {
        let state = Self::new(config);
        if state.config.seed_default_data {
            storage::seed::seed_default_data(&state.store, state.config.bcrypt_cost).await?;
        }
        Ok(state)
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handlers::auth::auth_routes())
        .merge(handlers::conversations::conversation_routes())
        .merge(handlers::messages::message_routes())
        .merge(handlers::form_fields::form_field_routes())
        .merge(handlers::agents::agent_routes())
        .merge(handlers::stats::stats_routes())
        .merge(handlers::status::status_routes())
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
