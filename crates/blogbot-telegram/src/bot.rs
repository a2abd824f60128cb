//! Telegram bot implementation

use std::sync::Arc;

use teloxide::{dispatching::UpdateFilterExt, prelude::*, utils::command::BotCommands};
use tracing::{info, warn};

use blogbot_core::DialogueController;

use crate::commands::{Command, handle_callback, handle_command, handle_text};
use crate::error::{Result, TelegramError};

/// Telegram bot wrapper
pub struct TelegramBot {
    bot: Bot,
    controller: Arc<DialogueController>,
}

impl TelegramBot {
    /// Create a new Telegram bot
    pub fn new(token: &str, controller: DialogueController) -> Result<Self> {
        if token.is_empty() {
            return Err(TelegramError::TokenNotSet);
        }

        Ok(Self {
            bot: Bot::new(token),
            controller: Arc::new(controller),
        })
    }

    /// Start the bot and run until Ctrl+C
    pub async fn start(self) -> Result<()> {
        info!(
            "Starting Telegram bot (generation {})",
            if self.controller.generation_enabled() {
                "enabled"
            } else {
                "disabled"
            }
        );

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!("Failed to set command menu: {}", e);
        }

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .branch(
                        dptree::entry()
                            .filter_command::<Command>()
                            .endpoint(handle_command),
                    )
                    .branch(dptree::endpoint(handle_text)),
            )
            .branch(Update::filter_callback_query().endpoint(handle_callback));

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.controller])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram bot stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogbot_core::{AllowList, PublishClient, PublishConfig, SessionStore};

    fn controller() -> DialogueController {
        let publisher = PublishClient::new(&PublishConfig {
            api_url: "http://localhost:8000/api/posts/".to_string(),
            api_token: "token".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        DialogueController::new(
            AllowList::new([42]),
            SessionStore::new(3600),
            Arc::new(publisher),
        )
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            TelegramBot::new("", controller()),
            Err(TelegramError::TokenNotSet)
        ));
    }

    #[test]
    fn test_new_with_token() {
        assert!(TelegramBot::new("123456:ABC", controller()).is_ok());
    }
}
