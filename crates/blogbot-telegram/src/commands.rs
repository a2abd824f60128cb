//! Telegram update handlers

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatAction, MessageId};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info};

use blogbot_core::dialogue::replies;
use blogbot_core::{ConversationKey, DialogueController, DialogueState, InboundEvent};

use crate::error::Result;
use crate::render::deliver_all;

/// Telegram bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "blogbot commands")]
pub enum Command {
    #[command(description = "Start writing a new post")]
    Start,
    #[command(description = "Cancel the current post")]
    Cancel,
}

impl From<Command> for InboundEvent {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::Start => InboundEvent::Start,
            Command::Cancel => InboundEvent::Cancel,
        }
    }
}

/// Conversation key for a message, if it has a sender
fn message_key(msg: &Message) -> Option<ConversationKey> {
    let user = msg.from.as_ref()?;
    Some(ConversationKey::new(msg.chat.id.0, user.id.0))
}

/// Where a button press came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CallbackOrigin {
    chat_id: ChatId,
    message_id: MessageId,
    key: ConversationKey,
}

/// Origin of a button press, if its message is still known
///
/// The chat is the one holding the button; the user is whoever pressed it.
fn callback_origin(q: &CallbackQuery) -> Option<CallbackOrigin> {
    let message = q.message.as_ref()?;
    let chat_id = message.chat().id;
    Some(CallbackOrigin {
        chat_id,
        message_id: message.id(),
        key: ConversationKey::new(chat_id.0, q.from.id.0),
    })
}

/// Run one event through the controller and deliver the replies
///
/// Delivery failures are logged, not returned, so one bad chat never
/// stops the dispatcher. A conversation whose replies did not arrive is
/// ended.
async fn dispatch(
    bot: &Bot,
    controller: &DialogueController,
    chat_id: ChatId,
    key: ConversationKey,
    origin: Option<MessageId>,
    event: InboundEvent,
) {
    let out = controller.handle(key, event).await;
    if let Err(e) = deliver_all(bot, chat_id, origin, &out).await {
        error!("Failed to deliver reply to {}: {}", key, e);
        if controller.abandon(key) {
            if let Err(e) = bot.send_message(chat_id, replies::DELIVERY_FAILED).await {
                debug!("Failed to send delivery notice to {}: {}", key, e);
            }
        }
    }
}

/// Handle /start and /cancel
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    controller: Arc<DialogueController>,
) -> Result<()> {
    let Some(key) = message_key(&msg) else {
        return Ok(());
    };

    if cmd == Command::Cancel {
        info!("Cancel requested: {}", key);
    }

    dispatch(&bot, &controller, msg.chat.id, key, None, cmd.into()).await;
    Ok(())
}

/// Handle free text
///
/// Unknown commands and non-text messages are ignored.
pub async fn handle_text(
    bot: Bot,
    msg: Message,
    controller: Arc<DialogueController>,
) -> Result<()> {
    let (Some(key), Some(text)) = (message_key(&msg), msg.text()) else {
        return Ok(());
    };
    if text.starts_with('/') {
        debug!("Ignoring unknown command from {}", key);
        return Ok(());
    }

    let generating = controller
        .sessions()
        .get(&key)
        .is_some_and(|s| s.state == DialogueState::GenerateInput);
    if generating {
        // Generation can take a while
        if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
            debug!("Failed to send typing action: {}", e);
        }
    }

    dispatch(
        &bot,
        &controller,
        msg.chat.id,
        key,
        None,
        InboundEvent::Text(text.to_string()),
    )
    .await;
    Ok(())
}

/// Handle inline button presses
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    controller: Arc<DialogueController>,
) -> Result<()> {
    // Stop the button spinner before any slow work
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        debug!("Failed to answer callback query {}: {}", q.id, e);
    }

    let (Some(origin), Some(data)) = (callback_origin(&q), q.data.clone()) else {
        return Ok(());
    };
    debug!("Callback from {}: {}", origin.key, data);

    dispatch(
        &bot,
        &controller,
        origin.chat_id,
        origin.key,
        Some(origin.message_id),
        InboundEvent::Callback(data),
    )
    .await;
    Ok(())
}
