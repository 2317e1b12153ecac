//! Provider abstractions and failover orchestration.
//!
//! This module defines the core traits and machinery for routing a chat
//! request across multiple LLM providers:
//! - `ProviderAdapter`: RPITIT trait for concrete provider implementations
//! - `BoxProviderAdapter`: object-safe wrapper for dynamic dispatch
//! - `FailoverPlan`: ordered attempt sequence (preferred provider first)
//! - `FailoverOrchestrator`: sequential failover with mid-stream recovery

pub mod adapter;
pub mod box_adapter;
pub mod orchestrator;
pub mod plan;
