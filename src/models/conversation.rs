use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Active,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub request_type: Option<String>,
    pub content: Option<String>,
    pub assigned_agent_id: Option<i32>,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn is_assigned_to(&self, agent_id: i32) -> bool {
        self.assigned_agent_id == Some(agent_id)
    }

    /// Case-insensitive match on name and content, raw substring match on phone.
    pub fn matches(&self, query: &str) -> bool {
        let lower = query.to_lowercase();
        self.customer_name.to_lowercase().contains(&lower)
            || self.customer_phone.contains(query)
            || self
                .content
                .as_deref()
                .is_some_and(|content| content.to_lowercase().contains(&lower))
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewConversation {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub request_type: Option<String>,
    pub content: Option<String>,
    pub assigned_agent_id: Option<i32>,
}

/// Partial update applied by `MemoryStore::update_conversation`.
#[derive(Debug, Clone, Default)]
pub struct ConversationUpdate {
    pub status: Option<ConversationStatus>,
}

/// Body posted by the widget's pre-chat form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreChatForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub request_type: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConversationRequest {
    pub status: ConversationStatus,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}
