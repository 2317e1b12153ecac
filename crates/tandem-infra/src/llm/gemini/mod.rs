//! Gemini LLM provider implementation.
//!
//! Talks to the Gemini native REST API (`generateContent` for one-shot
//! replies, `streamGenerateContent?alt=sse` for streaming) with the API
//! key sent in the `x-goog-api-key` header.

pub mod client;
pub mod streaming;
pub mod types;

pub use client::GeminiAdapter;
