//! Infrastructure layer for Tandem.
//!
//! Concrete implementations of the ports defined in `tandem-core`: the
//! Gemini and OpenAI provider adapters, SQLite transcript storage, TOML
//! configuration loading, and the assembly functions that wire a
//! configuration into a runnable conversation service.

pub mod assemble;
pub mod config;
pub mod llm;
pub mod sqlite;
