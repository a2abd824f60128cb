//! blogbot-telegram: Telegram transport for blogbot
//!
//! Turns Telegram updates into dialogue events and renders the dialogue's
//! replies as Telegram messages.

pub mod bot;
pub mod commands;
pub mod error;
pub mod render;

pub use bot::TelegramBot;
pub use commands::Command;
pub use error::{Result, TelegramError};
