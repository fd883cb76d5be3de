use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{auth_middleware, CurrentAgent};
use crate::models::conversation::*;
use crate::services::routing;
use crate::validation::{optional, required};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn conversation_routes() -> Router {
    // Opened from the embeddable widget, no agent token involved
    let public_routes = Router::new().route("/api/conversations", post(create_conversation));

    let protected_routes = Router::new()
        .route("/api/conversations", get(list_my_conversations))
        .route("/api/conversations/all", get(list_all_conversations))
        .route("/api/conversations/search", get(search_conversations))
        .route(
            "/api/conversations/:id",
            get(get_conversation).patch(update_conversation),
        )
        .layer(axum::middleware::from_fn(auth_middleware));

    public_routes.merge(protected_routes)
}

async fn create_conversation(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<PreChatForm>, JsonRejection>,
) -> ApiResult<Json<Conversation>> {
    let Json(form) = payload?;

    let new_conversation = NewConversation {
        customer_name: required(&form.customer_name, "Customer name is required")?,
        customer_phone: required(&form.customer_phone, "Customer phone is required")?,
        customer_address: optional(form.customer_address),
        request_type: optional(form.request_type),
        content: optional(form.content),
        assigned_agent_id: None,
    };

    let opened = routing::open_conversation(
        &state.store,
        new_conversation,
        &state.config.welcome_message,
    )
    .await;

    Ok(Json(opened.conversation))
}

async fn list_my_conversations(
    Extension(state): Extension<Arc<AppState>>,
    current: CurrentAgent,
) -> Json<Vec<Conversation>> {
    Json(state.store.list_conversations_by_agent(current.id).await)
}

async fn list_all_conversations(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<Vec<Conversation>> {
    Json(state.store.list_conversations().await)
}

async fn search_conversations(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Conversation>>> {
    let Query(query) = query?;
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Search keyword is required".to_string()))?;

    Ok(Json(state.store.search_conversations(q.trim()).await))
}

/// Loads a conversation the caller is assigned to: 404 when unknown, 403 otherwise.
pub(crate) async fn owned_conversation(
    state: &AppState,
    conversation_id: i32,
    agent: &CurrentAgent,
) -> ApiResult<Conversation> {
    let conversation = state
        .store
        .get_conversation(conversation_id)
        .await
        .ok_or_else(ApiError::conversation_not_found)?;

    if !conversation.is_assigned_to(agent.id) {
        tracing::warn!(
            conversation_id,
            agent_id = agent.id,
            assigned_agent_id = ?conversation.assigned_agent_id,
            "agent denied access to conversation"
        );
        return Err(ApiError::Forbidden(
            "You do not have access to this conversation".to_string(),
        ));
    }

    Ok(conversation)
}

async fn get_conversation(
    Extension(state): Extension<Arc<AppState>>,
    current: CurrentAgent,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Conversation>> {
    let Path(id) = id?;
    let conversation = owned_conversation(&state, id, &current).await?;
    Ok(Json(conversation))
}

async fn update_conversation(
    Extension(state): Extension<Arc<AppState>>,
    current: CurrentAgent,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateConversationRequest>, JsonRejection>,
) -> ApiResult<Json<Conversation>> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    owned_conversation(&state, id, &current).await?;

    let updated = state
        .store
        .update_conversation(
            id,
            ConversationUpdate {
                status: Some(payload.status),
            },
        )
        .await
        .ok_or_else(ApiError::conversation_not_found)?;

    tracing::info!(
        conversation_id = id,
        agent_id = current.id,
        status = ?updated.status,
        "conversation status updated"
    );

    Ok(Json(updated))
}
