//! Draft generation through a chat-completions API
//!
//! Works with Mistral and other OpenAI-compatible endpoints.

mod client;
mod types;

pub use client::CompletionClient;
pub use types::*;
