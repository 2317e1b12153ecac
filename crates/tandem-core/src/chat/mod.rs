//! Conversation state, the feedback loop, and the persistence port.
//!
//! This module defines the `TranscriptSink` trait that the infrastructure
//! layer implements, the append-only `Conversation` state, and the
//! `ConversationService` that drives the ask / feedback / clarification
//! flow over the failover orchestrator.

pub mod conversation;
pub mod service;
pub mod sink;
