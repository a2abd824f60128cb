//! blogbot-core: conversational publishing core
//!
//! Configuration, the allow-list gate, the content API and completion API
//! clients, per-conversation sessions and the dialogue state machine that
//! ties them together. Nothing here depends on a chat transport.

pub mod auth;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod llm;
pub mod publish;
pub mod session;
pub mod text;

pub use auth::AllowList;
pub use config::{Config, LlmConfig, PublishConfig, SessionConfig, TelegramConfig};
pub use dialogue::{
    Button, Choice, Delivery, DialogueController, DialogueState, InboundEvent, OutboundMessage,
    TextFormat,
};
pub use error::{Error, Result};
pub use llm::{CompletionClient, DraftGenerator, GenerationOutcome};
pub use publish::{PublishClient, PublishOutcome, PublishRequest, Publisher};
pub use session::{ConversationKey, Session, SessionStore};
