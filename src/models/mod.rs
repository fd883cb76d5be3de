// src/models/mod.rs
pub mod agent;
pub mod auth;
pub mod conversation;
pub mod form_field;
pub mod message;
pub mod stats;
