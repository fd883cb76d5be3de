// src/services/routing.rs
//! Conversation assignment.
//!
//! First-fit: a new conversation goes to the first online agent in id order.
//! With nobody online it stays unassigned. There is no queue and no later
//! reassignment.

use crate::models::conversation::{Conversation, NewConversation};
use crate::models::message::Message;
use crate::storage::MemoryStore;

pub struct OpenedConversation {
    pub conversation: Conversation,
    pub welcome: Option<Message>,
}

pub async fn open_conversation(
    store: &MemoryStore,
    new_conversation: NewConversation,
    welcome_message: &str,
) -> OpenedConversation {
    let (conversation, welcome) = store.open_conversation(new_conversation, welcome_message).await;

    match conversation.assigned_agent_id {
        Some(agent_id) => tracing::info!(
            conversation_id = conversation.id,
            agent_id,
            "conversation assigned"
        ),
        None => tracing::warn!(
            conversation_id = conversation.id,
            "no agent online, conversation left unassigned"
        ),
    }

    OpenedConversation {
        conversation,
        welcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::agent::NewAgent;
    use crate::models::message::SenderType;

    async fn store_with_agents(agents: &[(&str, bool)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (email, is_online) in agents {
            store
                .create_agent(NewAgent {
                    email: email.to_string(),
                    password_hash: String::new(),
                    name: format!("Agent {}", email),
                    is_online: *is_online,
                })
                .await
                .unwrap();
        }
        store
    }

    fn form() -> NewConversation {
        NewConversation {
            customer_name: "Nguyen Van An".to_string(),
            customer_phone: "0901234567".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_agent_online_leaves_conversation_unassigned() {
        let store = store_with_agents(&[("a@x.com", false), ("b@x.com", false)]).await;

        let opened = open_conversation(&store, form(), "Hello").await;

        assert_eq!(opened.conversation.assigned_agent_id, None);
        assert!(opened.welcome.is_none());
        assert!(store
            .list_messages_by_conversation(opened.conversation.id)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_assigns_first_online_agent_with_one_welcome_message() {
        let store = store_with_agents(&[("a@x.com", false), ("b@x.com", true), ("c@x.com", true)]).await;

        let opened = open_conversation(&store, form(), "Hello").await;

        assert_eq!(opened.conversation.assigned_agent_id, Some(2));
        let messages = store.list_messages_by_conversation(opened.conversation.id).await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender_type, SenderType::Agent);
        assert_eq!(messages[0].sender_name, "Agent b@x.com");
        assert_eq!(messages[0].message, "Hello");
    }

    #[tokio::test]
    async fn test_assignment_ignores_caller_supplied_agent() {
        let store = store_with_agents(&[("a@x.com", false)]).await;
        let mut spoofed = form();
        spoofed.assigned_agent_id = Some(1);

        let opened = open_conversation(&store, spoofed, "Hello").await;
        assert_eq!(opened.conversation.assigned_agent_id, None);
    }

    #[tokio::test]
    async fn test_logged_out_agent_gets_no_new_conversations() {
        let store = store_with_agents(&[("a@x.com", true), ("b@x.com", true)]).await;
        store.update_agent_status(1, false).await;

        let opened = open_conversation(&store, form(), "Hello").await;

        assert_eq!(opened.conversation.assigned_agent_id, Some(2));
        assert_eq!(
            opened.welcome.map(|m| m.sender_name),
            Some("Agent b@x.com".to_string())
        );
    }
}
