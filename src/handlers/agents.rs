use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{auth_middleware, CurrentAgent};
use crate::models::agent::{CreateAgentRequest, NewAgent};
use crate::models::auth::AgentResponse;
use crate::validation::{is_valid_email, required, MIN_PASSWORD_LEN};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::Json,
    routing::get,
    Router,
};
use bcrypt::hash;
use std::sync::Arc;

pub fn agent_routes() -> Router {
    Router::new()
        .route("/api/agents", get(list_agents).post(create_agent))
        .layer(axum::middleware::from_fn(auth_middleware))
}

async fn list_agents(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<AgentResponse>> {
    let agents = state.store.list_agents().await;
    Json(agents.into_iter().map(AgentResponse::from).collect())
}

async fn create_agent(
    Extension(state): Extension<Arc<AppState>>,
    current: CurrentAgent,
    payload: Result<Json<CreateAgentRequest>, JsonRejection>,
) -> ApiResult<Json<AgentResponse>> {
    let Json(payload) = payload?;

    let email = payload.email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    let name = required(&payload.name, "Name is required")?;
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    let password_hash = hash(&payload.password, state.config.bcrypt_cost)?;

    let agent = state
        .store
        .create_agent(NewAgent {
            email,
            password_hash,
            name,
            is_online: payload.is_online.unwrap_or(false),
        })
        .await?;

    tracing::info!(agent_id = agent.id, created_by = current.id, "agent created");
    Ok(Json(AgentResponse::from(agent)))
}
