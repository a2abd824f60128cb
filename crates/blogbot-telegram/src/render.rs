//! Rendering dialogue replies as Telegram messages

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use teloxide::{ApiError, RequestError};
use tracing::{debug, warn};

use blogbot_core::{Button, Delivery, OutboundMessage, TextFormat};

use crate::error::Result;

/// How a single chunk is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Replace the text of the message whose button was pressed
    Edit,
    /// Send a new message
    Send,
}

/// One Telegram API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<'a> {
    pub kind: StepKind,
    pub text: &'a str,
    /// Attach the inline keyboard to this chunk
    pub with_keyboard: bool,
}

/// Work out the API calls for `message`
///
/// Only the first chunk can replace the pressed message; the rest are sent
/// as new messages. The keyboard rides on the last chunk.
pub fn plan(message: &OutboundMessage, can_edit: bool) -> Vec<Step<'_>> {
    let last = message.chunks.len().saturating_sub(1);
    let edit_first = can_edit && message.delivery == Delivery::EditOrigin;

    message
        .chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| Step {
            kind: if i == 0 && edit_first {
                StepKind::Edit
            } else {
                StepKind::Send
            },
            text: chunk,
            with_keyboard: i == last && !message.buttons.is_empty(),
        })
        .collect()
}

/// Inline keyboard with every button on one row
pub fn keyboard(buttons: &[Button]) -> InlineKeyboardMarkup {
    let row: Vec<InlineKeyboardButton> = buttons
        .iter()
        .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
        .collect();
    InlineKeyboardMarkup::new(vec![row])
}

#[allow(deprecated)] // legacy Markdown, which is what the drafts are written in
fn parse_mode(format: TextFormat) -> Option<ParseMode> {
    match format {
        TextFormat::Plain => None,
        TextFormat::Markdown => Some(ParseMode::Markdown),
    }
}

/// Perform one step with the given parse mode
async fn send_step(
    bot: &Bot,
    chat_id: ChatId,
    origin: Option<MessageId>,
    step: &Step<'_>,
    mode: Option<ParseMode>,
    buttons: &[Button],
) -> std::result::Result<(), RequestError> {
    match (step.kind, origin) {
        (StepKind::Edit, Some(message_id)) => {
            debug!("Editing message {} in chat {}", message_id.0, chat_id);
            let mut request = bot.edit_message_text(chat_id, message_id, step.text);
            if let Some(mode) = mode {
                request = request.parse_mode(mode);
            }
            if step.with_keyboard {
                request = request.reply_markup(keyboard(buttons));
            }
            request.await?;
        }
        _ => {
            let mut request = bot.send_message(chat_id, step.text);
            if let Some(mode) = mode {
                request = request.parse_mode(mode);
            }
            if step.with_keyboard {
                request = request.reply_markup(keyboard(buttons));
            }
            request.await?;
        }
    }
    Ok(())
}

/// Deliver one reply to `chat_id`
///
/// `origin` is the message carrying the pressed button, if any. A chunk
/// whose Markdown Telegram cannot parse is resent as plain text.
pub async fn deliver(
    bot: &Bot,
    chat_id: ChatId,
    origin: Option<MessageId>,
    message: &OutboundMessage,
) -> Result<()> {
    let mode = parse_mode(message.format);

    for step in plan(message, origin.is_some()) {
        match send_step(bot, chat_id, origin, &step, mode, &message.buttons).await {
            Err(RequestError::Api(ApiError::CantParseEntities(reason))) if mode.is_some() => {
                warn!(
                    "Telegram rejected Markdown in chat {} ({}), resending as plain text",
                    chat_id, reason
                );
                send_step(bot, chat_id, origin, &step, None, &message.buttons).await?;
            }
            other => other?,
        }
    }

    Ok(())
}

/// Deliver every reply in order
pub async fn deliver_all(
    bot: &Bot,
    chat_id: ChatId,
    origin: Option<MessageId>,
    messages: &[OutboundMessage],
) -> Result<()> {
    for message in messages {
        deliver(bot, chat_id, origin, message).await?;
    }
    Ok(())
}
