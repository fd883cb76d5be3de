use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub today_conversations: usize,
    pub pending_replies: usize,
    pub avg_response_time: String,
    pub satisfaction: f64,
}
