// src/services/mod.rs
pub mod routing;
pub mod stats;
