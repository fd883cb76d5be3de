// src/services/stats.rs
use crate::models::conversation::{Conversation, ConversationStatus};
use crate::models::stats::AgentStats;
use chrono::{DateTime, Utc};

// Placeholders shown on the dashboard until response times and ratings are tracked
const AVG_RESPONSE_TIME: &str = "2m 30s";
const SATISFACTION: f64 = 4.8;

/// Dashboard counters over one agent's conversations. "Today" starts at 00:00 UTC.
pub fn agent_stats(conversations: &[Conversation], now: DateTime<Utc>) -> AgentStats {
    let start_of_day = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now);

    AgentStats {
        today_conversations: conversations
            .iter()
            .filter(|c| c.created_at >= start_of_day)
            .count(),
        pending_replies: conversations
            .iter()
            .filter(|c| c.status == ConversationStatus::Active)
            .count(),
        avg_response_time: AVG_RESPONSE_TIME.to_string(),
        satisfaction: SATISFACTION,
    }
}
