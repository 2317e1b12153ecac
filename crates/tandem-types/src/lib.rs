//! Shared domain types for Tandem.
//!
//! This crate contains the core domain types used across the Tandem
//! orchestrator: chat turns, transcripts, provider errors, stream events,
//! and configuration.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
