//! Failover orchestration and conversation logic for Tandem.
//!
//! This crate holds the provider-agnostic core: the `ProviderAdapter` trait
//! that the infrastructure layer implements, the failover plan and
//! orchestrator, and the conversation service with its `TranscriptSink`
//! port. It depends only on `tandem-types` -- never on `tandem-infra` or
//! any HTTP/database crate.

pub mod chat;
pub mod llm;
