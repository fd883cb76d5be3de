// src/storage/mod.rs
//! In-memory data store for agents, conversations, messages and pre-chat form fields.
//!
//! Nothing is persisted: all state lives in process memory and is lost on restart.
//! Every table sits behind one `RwLock`, so compound mutations such as
//! "append a message and bump the conversation's `updated_at`" are atomic.

pub mod seed;

use crate::models::agent::{Agent, NewAgent};
use crate::models::conversation::{Conversation, ConversationStatus, ConversationUpdate, NewConversation};
use crate::models::form_field::{FormField, NewFormField};
use crate::models::message::{Message, NewMessage, SenderType};
use chrono::Utc;
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("An agent with email {0} already exists")]
    DuplicateEmail(String),
    #[error("Conversation {0} does not exist")]
    ConversationNotFound(i32),
}

/// Monotonic id sequence, one per entity type. Ids start at 1.
#[derive(Debug)]
struct Sequence(i32);

impl Sequence {
    fn new() -> Self {
        Self(1)
    }

    fn next(&mut self) -> i32 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

#[derive(Debug)]
struct Tables {
    // BTreeMap keyed by id: iteration order is insertion order
    agents: BTreeMap<i32, Agent>,
    conversations: BTreeMap<i32, Conversation>,
    messages: BTreeMap<i32, Message>,
    form_fields: BTreeMap<i32, FormField>,
    agent_ids: Sequence,
    conversation_ids: Sequence,
    message_ids: Sequence,
    form_field_ids: Sequence,
}

#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store. See `seed::seed_default_data` for the demo agents and form.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                agents: BTreeMap::new(),
                conversations: BTreeMap::new(),
                messages: BTreeMap::new(),
                form_fields: BTreeMap::new(),
                agent_ids: Sequence::new(),
                conversation_ids: Sequence::new(),
                message_ids: Sequence::new(),
                form_field_ids: Sequence::new(),
            }),
        }
    }

    // ----- agents -----

    pub async fn get_agent(&self, id: i32) -> Option<Agent> {
        self.tables.read().await.agents.get(&id).cloned()
    }

    pub async fn get_agent_by_email(&self, email: &str) -> Option<Agent> {
        self.tables
            .read()
            .await
            .agents
            .values()
            .find(|agent| agent.email == email)
            .cloned()
    }

    pub async fn create_agent(&self, new_agent: NewAgent) -> Result<Agent, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.agents.values().any(|agent| agent.email == new_agent.email) {
            return Err(StoreError::DuplicateEmail(new_agent.email));
        }

        let agent = Agent {
            id: tables.agent_ids.next(),
            email: new_agent.email,
            password_hash: new_agent.password_hash,
            name: new_agent.name,
            is_online: new_agent.is_online,
            created_at: Utc::now(),
        };
        tables.agents.insert(agent.id, agent.clone());
        Ok(agent)
    }

    /// Returns the updated agent, or `None` when the id is unknown.
    pub async fn update_agent_status(&self, id: i32, is_online: bool) -> Option<Agent> {
        let mut tables = self.tables.write().await;
        let agent = tables.agents.get_mut(&id)?;
        agent.is_online = is_online;
        Some(agent.clone())
    }

    pub async fn list_agents(&self) -> Vec<Agent> {
        self.tables.read().await.agents.values().cloned().collect()
    }

    // ----- conversations -----

    pub async fn get_conversation(&self, id: i32) -> Option<Conversation> {
        self.tables.read().await.conversations.get(&id).cloned()
    }

    pub async fn create_conversation(&self, new_conversation: NewConversation) -> Conversation {
        let mut tables = self.tables.write().await;
        insert_conversation(&mut tables, new_conversation)
    }

    /// Applies `update` and stamps `updated_at`. `None` when the id is unknown.
    pub async fn update_conversation(
        &self,
        id: i32,
        update: ConversationUpdate,
    ) -> Option<Conversation> {
        let mut tables = self.tables.write().await;
        let conversation = tables.conversations.get_mut(&id)?;

        if let Some(status) = update.status {
            conversation.status = status;
        }
        conversation.updated_at = Utc::now().max(conversation.updated_at);

        Some(conversation.clone())
    }

    pub async fn list_conversations_by_agent(&self, agent_id: i32) -> Vec<Conversation> {
        let tables = self.tables.read().await;
        newest_first(
            tables
                .conversations
                .values()
                .filter(|conversation| conversation.is_assigned_to(agent_id))
                .cloned()
                .collect(),
        )
    }

    pub async fn list_conversations(&self) -> Vec<Conversation> {
        let tables = self.tables.read().await;
        newest_first(tables.conversations.values().cloned().collect())
    }

    pub async fn search_conversations(&self, query: &str) -> Vec<Conversation> {
        let tables = self.tables.read().await;
        newest_first(
            tables
                .conversations
                .values()
                .filter(|conversation| conversation.matches(query))
                .cloned()
                .collect(),
        )
    }

    /// Assigns a new conversation to the first online agent in id order and, when
    /// there is one, records `welcome_text` as that agent's first message. The pick
    /// and both inserts share one write guard: a concurrent logout either lands
    /// before the pick or after the greeting.
    pub async fn open_conversation(
        &self,
        mut new_conversation: NewConversation,
        welcome_text: &str,
    ) -> (Conversation, Option<Message>) {
        let mut tables = self.tables.write().await;

        let agent = tables
            .agents
            .values()
            .find(|agent| agent.is_online)
            .map(|agent| (agent.id, agent.name.clone()));
        new_conversation.assigned_agent_id = agent.as_ref().map(|(id, _)| *id);

        let conversation = insert_conversation(&mut tables, new_conversation);

        let welcome = match agent {
            Some((_, sender_name)) => {
                let message = NewMessage {
                    conversation_id: conversation.id,
                    sender_type: SenderType::Agent,
                    sender_name,
                    message: welcome_text.to_string(),
                };
                append_message(&mut tables, message).ok()
            }
            None => None,
        };

        // Re-read: the greeting bumped updated_at
        let conversation = tables
            .conversations
            .get(&conversation.id)
            .cloned()
            .unwrap_or(conversation);

        (conversation, welcome)
    }

    // ----- messages -----

    pub async fn get_message(&self, id: i32) -> Option<Message> {
        self.tables.read().await.messages.get(&id).cloned()
    }

    /// Appends a message and bumps the parent conversation's `updated_at` so that
    /// it is never earlier than the message's `created_at`.
    pub async fn create_message(&self, new_message: NewMessage) -> Result<Message, StoreError> {
        let mut tables = self.tables.write().await;
        append_message(&mut tables, new_message)
    }

    /// Oldest first. Ties on `created_at` keep id order.
    pub async fn list_messages_by_conversation(&self, conversation_id: i32) -> Vec<Message> {
        let tables = self.tables.read().await;
        let mut messages: Vec<Message> = tables
            .messages
            .values()
            .filter(|message| message.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        messages
    }

    // ----- form fields -----

    /// Ascending by display order. Ties keep id order.
    pub async fn list_form_fields(&self) -> Vec<FormField> {
        let tables = self.tables.read().await;
        let mut fields: Vec<FormField> = tables.form_fields.values().cloned().collect();
        fields.sort_by_key(|field| field.order);
        fields
    }

    pub async fn create_form_field(&self, new_field: NewFormField) -> FormField {
        let mut tables = self.tables.write().await;
        let field = FormField {
            id: tables.form_field_ids.next(),
            field_name: new_field.field_name,
            field_type: new_field.field_type,
            label: new_field.label,
            required: new_field.required,
            options: new_field.options,
            order: new_field.order,
        };
        tables.form_fields.insert(field.id, field.clone());
        field
    }
}

fn insert_conversation(tables: &mut Tables, new_conversation: NewConversation) -> Conversation {
    let now = Utc::now();
    let conversation = Conversation {
        id: tables.conversation_ids.next(),
        customer_name: new_conversation.customer_name,
        customer_phone: new_conversation.customer_phone,
        customer_address: new_conversation.customer_address,
        request_type: new_conversation.request_type,
        content: new_conversation.content,
        assigned_agent_id: new_conversation.assigned_agent_id,
        status: ConversationStatus::Active,
        created_at: now,
        updated_at: now,
    };
    tables.conversations.insert(conversation.id, conversation.clone());
    conversation
}

fn append_message(tables: &mut Tables, new_message: NewMessage) -> Result<Message, StoreError> {
    let conversation = tables
        .conversations
        .get_mut(&new_message.conversation_id)
        .ok_or(StoreError::ConversationNotFound(new_message.conversation_id))?;

    let now = Utc::now();
    conversation.updated_at = now.max(conversation.updated_at);

    let message = Message {
        id: tables.message_ids.next(),
        conversation_id: new_message.conversation_id,
        sender_type: new_message.sender_type,
        sender_name: new_message.sender_name,
        message: new_message.message,
        created_at: now,
    };
    tables.messages.insert(message.id, message.clone());
    Ok(message)
}

/// Stable sort by `updated_at` descending; equal timestamps keep insertion order.
fn newest_first(mut conversations: Vec<Conversation>) -> Vec<Conversation> {
    conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    conversations
}
