use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Agent {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_online: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields the store needs to create an agent. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_online: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub is_online: Option<bool>,
}
