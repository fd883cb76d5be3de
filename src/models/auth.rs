use crate::models::agent::Agent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an agent. Never carries password material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub is_online: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub agent: AgentResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // agent id
    pub email: String,
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn agent_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

impl From<Agent> for AgentResponse {
    fn from(agent: Agent) -> Self {
        AgentResponse {
            id: agent.id,
            email: agent.email,
            name: agent.name,
            is_online: agent.is_online,
            created_at: agent.created_at,
        }
    }
}
