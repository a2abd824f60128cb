//! Per-conversation session storage
//!
//! Holds the dialogue state of every unfinished conversation in memory.

mod store;
mod types;

pub use store::SessionStore;
pub use types::{ConversationKey, Session};
