use crate::middleware::auth::{auth_middleware, CurrentAgent};
use crate::models::stats::AgentStats;
use crate::services::stats::agent_stats;
use crate::AppState;
use axum::{extract::Extension, response::Json, routing::get, Router};
use chrono::Utc;
use std::sync::Arc;

pub fn stats_routes() -> Router {
    Router::new()
        .route("/api/stats", get(get_stats))
        .layer(axum::middleware::from_fn(auth_middleware))
}

async fn get_stats(
    Extension(state): Extension<Arc<AppState>>,
    current: CurrentAgent,
) -> Json<AgentStats> {
    let conversations = state.store.list_conversations_by_agent(current.id).await;
    Json(agent_stats(&conversations, Utc::now()))
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_stats_for_current_agent() {
        let (app, _) = test_app().await;
        let first = create_conversation(&app, "A", "1").await;
        create_conversation(&app, "B", "2").await;
        let token = login(&app, ONLINE_AGENT).await;

        send(
            &app,
            Method::PATCH,
            &format!("/api/conversations/{}", first["id"]),
            Some(&token),
            Some(json!({ "status": "closed" })),
        )
        .await;

        let (status, stats) = send(&app, Method::GET, "/api/stats", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["todayConversations"], 2);
        assert_eq!(stats["pendingReplies"], 1);
        assert_eq!(stats["avgResponseTime"], "2m 30s");
        assert_eq!(stats["satisfaction"], 4.8);
    }

    #[tokio::test]
    async fn test_stats_requires_token() {
        let (app, _) = test_app().await;
        let (status, _) = send(&app, Method::GET, "/api/stats", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
