use crate::models::conversation::ConversationStatus;
use crate::AppState;
use axum::{
    extract::Extension,
    response::{Html, Json},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;

pub fn status_routes() -> Router {
    Router::new()
        .route("/api/status", get(api_status))
        .route("/api/docs", get(api_documentation))
}

async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<serde_json::Value> {
    let agents = state.store.list_agents().await;
    let conversations = state.store.list_conversations().await;

    let agents_online = agents.iter().filter(|a| a.is_online).count();
    let active = conversations
        .iter()
        .filter(|c| c.status == ConversationStatus::Active)
        .count();
    let unassigned = conversations
        .iter()
        .filter(|c| c.assigned_agent_id.is_none())
        .count();

    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": "in-memory (reset on restart)",
        "agents": {
            "total": agents.len(),
            "online": agents_online
        },
        "conversations": {
            "total": conversations.len(),
            "active": active,
            "unassigned": unassigned
        },
        "endpoints": {
            "documentation": "/api/docs",
            "status": "/api/status",
            "auth": "/api/auth/*",
            "conversations": "/api/conversations/*",
            "formFields": "/api/form-fields"
        }
    }))
}

async fn api_documentation() -> Html<&'static str> {
    Html(API_DOCS)
}

const API_DOCS: &str = r###"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Support Chat - API Documentation</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 960px; margin: 0 auto; padding: 20px; line-height: 1.6; }
        .endpoint { background: #f8f9fa; border-left: 4px solid #007bff; padding: 0.75rem 1rem; margin: 0.75rem 0; border-radius: 5px; }
        .method { display: inline-block; padding: 0.1rem 0.5rem; border-radius: 3px; color: white; font-weight: bold; margin-right: 0.5rem; }
        .get { background: #28a745; } .post { background: #007bff; } .patch { background: #fd7e14; }
        code { background: #e9ecef; padding: 0.2rem 0.4rem; border-radius: 3px; }
        .auth-note { background: #fff3cd; border: 1px solid #ffeaa7; padding: 1rem; border-radius: 5px; }
    </style>
</head>
<body>
    <h1>Support Chat API</h1>
    <div class="auth-note">
        Endpoints marked 🔒 require <code>Authorization: Bearer &lt;token&gt;</code> from <code>/api/auth/login</code>.
        Data is kept in memory and lost when the server restarts.
    </div>

    <h2>Authentication</h2>
    <div class="endpoint"><span class="method post">POST</span><strong>/api/auth/login</strong> <code>{"email", "password"}</code></div>
    <div class="endpoint"><span class="method post">POST</span><strong>/api/auth/logout</strong> 🔒</div>
    <div class="endpoint"><span class="method get">GET</span><strong>/api/auth/me</strong> 🔒</div>

    <h2>Widget</h2>
    <div class="endpoint"><span class="method get">GET</span><strong>/api/form-fields</strong> pre-chat form definition</div>
    <div class="endpoint"><span class="method post">POST</span><strong>/api/conversations</strong> <code>{"customerName", "customerPhone", "customerAddress"?, "requestType"?, "content"?}</code></div>
    <div class="endpoint"><span class="method get">GET</span><strong>/api/conversations/:id/messages</strong></div>
    <div class="endpoint"><span class="method post">POST</span><strong>/api/conversations/:id/messages</strong> <code>{"senderType", "senderName", "message"}</code></div>

    <h2>Dashboard</h2>
    <div class="endpoint"><span class="method get">GET</span><strong>/api/conversations</strong> 🔒 assigned to the caller</div>
    <div class="endpoint"><span class="method get">GET</span><strong>/api/conversations/all</strong> 🔒</div>
    <div class="endpoint"><span class="method get">GET</span><strong>/api/conversations/search?q=</strong> 🔒</div>
    <div class="endpoint"><span class="method get">GET</span><strong>/api/conversations/:id</strong> 🔒 owner only</div>
    <div class="endpoint"><span class="method patch">PATCH</span><strong>/api/conversations/:id</strong> 🔒 owner only <code>{"status": "active" | "closed"}</code></div>
    <div class="endpoint"><span class="method post">POST</span><strong>/api/conversations/:id/messages/agent</strong> 🔒 owner only <code>{"message"}</code></div>
    <div class="endpoint"><span class="method get">GET</span><strong>/api/stats</strong> 🔒</div>

    <h2>Administration</h2>
    <div class="endpoint"><span class="method get">GET</span><strong>/api/agents</strong> 🔒</div>
    <div class="endpoint"><span class="method post">POST</span><strong>/api/agents</strong> 🔒 <code>{"email", "password", "name", "isOnline"?}</code></div>
    <div class="endpoint"><span class="method post">POST</span><strong>/api/form-fields</strong> 🔒 <code>{"fieldName", "fieldType", "label", "required"?, "options"?, "order"?}</code></div>
</body>
</html>
"###;
