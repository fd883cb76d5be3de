use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Customer,
    Agent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_type: SenderType,
    pub sender_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: i32,
    pub sender_type: SenderType,
    pub sender_name: String,
    pub message: String,
}

/// Message posted from the widget. Open endpoint, anyone holding the id may post.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub sender_type: SenderType,
    pub sender_name: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AgentMessageRequest {
    pub message: String,
}
