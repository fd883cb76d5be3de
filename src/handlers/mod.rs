// src/handlers/mod.rs
pub mod agents;
pub mod auth;
pub mod conversations;
pub mod form_fields;
pub mod messages;
pub mod stats;
pub mod status;
