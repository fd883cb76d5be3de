use crate::error::{ApiError, ApiResult};
use crate::handlers::conversations::owned_conversation;
use crate::middleware::auth::{auth_middleware, CurrentAgent};
use crate::models::message::*;
use crate::validation::required;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path,
    },
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn message_routes() -> Router {
    // Anyone holding a conversation id may read and post: the widget has no credentials
    let public_routes = Router::new().route(
        "/api/conversations/:id/messages",
        get(list_messages).post(send_message),
    );

    let protected_routes = Router::new()
        .route("/api/conversations/:id/messages/agent", post(send_agent_message))
        .layer(axum::middleware::from_fn(auth_middleware));

    public_routes.merge(protected_routes)
}

async fn list_messages(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Vec<Message>>> {
    let Path(conversation_id) = id?;

    if state.store.get_conversation(conversation_id).await.is_none() {
        return Err(ApiError::conversation_not_found());
    }

    Ok(Json(
        state.store.list_messages_by_conversation(conversation_id).await,
    ))
}

async fn send_message(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Path(conversation_id) = id?;
    let Json(payload) = payload?;

    let message = state
        .store
        .create_message(NewMessage {
            conversation_id,
            sender_type: payload.sender_type,
            sender_name: required(&payload.sender_name, "Sender name is required")?,
            message: required(&payload.message, "Message cannot be empty")?,
        })
        .await?;

    tracing::debug!(conversation_id, message_id = message.id, "message received");
    Ok(Json(message))
}

async fn send_agent_message(
    Extension(state): Extension<Arc<AppState>>,
    current: CurrentAgent,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<AgentMessageRequest>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Path(conversation_id) = id?;
    let Json(payload) = payload?;
    let text = required(&payload.message, "Message cannot be empty")?;

    owned_conversation(&state, conversation_id, &current).await?;

    let message = state
        .store
        .create_message(NewMessage {
            conversation_id,
            sender_type: SenderType::Agent,
            sender_name: current.name.clone(),
            message: text,
        })
        .await?;

    tracing::debug!(
        conversation_id,
        agent_id = current.id,
        message_id = message.id,
        "agent replied"
    );
    Ok(Json(message))
}
