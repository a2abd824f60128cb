//! Outbound messages

use crate::text::{MAX_MESSAGE_LENGTH, chunk_text};

use super::event::Choice;

/// How the transport should render the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Markdown,
}

/// Where the message goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// New message in the chat
    Reply,
    /// Replace the text of the message whose button was pressed
    EditOrigin,
}

/// Inline button: visible label plus callback tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, choice: Choice) -> Self {
        Self {
            label: label.into(),
            data: choice.tag().to_string(),
        }
    }
}

/// A message split into transport-sized chunks
///
/// Buttons belong to the last chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chunks: Vec<String>,
    pub format: TextFormat,
    pub delivery: Delivery,
    pub buttons: Vec<Button>,
}

impl OutboundMessage {
    fn build(text: &str, format: TextFormat, delivery: Delivery) -> Self {
        Self {
            chunks: chunk_text(text, MAX_MESSAGE_LENGTH),
            format,
            delivery,
            buttons: Vec::new(),
        }
    }

    /// Plain-text reply
    pub fn reply(text: impl AsRef<str>) -> Self {
        Self::build(text.as_ref(), TextFormat::Plain, Delivery::Reply)
    }

    /// Markdown reply
    pub fn markdown(text: impl AsRef<str>) -> Self {
        Self::build(text.as_ref(), TextFormat::Markdown, Delivery::Reply)
    }

    /// Plain-text edit of the message that carried the pressed button
    pub fn edit(text: impl AsRef<str>) -> Self {
        Self::build(text.as_ref(), TextFormat::Plain, Delivery::EditOrigin)
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    /// Full text with chunks joined back together
    pub fn text(&self) -> String {
        self.chunks.concat()
    }
}

/// User-facing texts
pub mod replies {
    use crate::dialogue::PostSource;
    use crate::publish::PublishOutcome;

    use super::{Button, Choice};

    pub const ACCESS_DENIED: &str = "⛔️ Access denied.";
    pub const CHOOSE_MODE: &str = "Choose a mode:";
    pub const ASK_TITLE: &str = "✍️ Enter the post title:";
    pub const ASK_PROMPT: &str = "🤖 Enter a prompt to generate the article:";
    pub const ASK_BODY: &str = "Now send the post body (Markdown is supported):";
    pub const PUBLISHED: &str = "✅ Post published.";
    pub const CANCELLED: &str = "Operation cancelled";
    pub const DRAFT_DISCARDED: &str = "❌ Operation cancelled.";
    pub const DELIVERY_FAILED: &str = "⚠️ Could not send the reply. The operation was cancelled, send /start to try again.";

    pub fn mode_buttons() -> Vec<Button> {
        vec![
            Button::new("✍️ Write a post manually", Choice::Manual),
            Button::new("🤖 Generate a post", Choice::Generate),
        ]
    }

    pub fn confirm_buttons() -> Vec<Button> {
        vec![
            Button::new("✅ Publish", Choice::Publish),
            Button::new("❌ Cancel", Choice::Cancel),
        ]
    }

    pub fn generation_failed(message: &str) -> String {
        format!("Generation error: {}", message)
    }

    /// Text reporting a publish outcome
    pub fn publish_result(source: PostSource, outcome: &PublishOutcome) -> String {
        match outcome {
            PublishOutcome::Published => PUBLISHED.to_string(),
            PublishOutcome::Rejected { status, body } => format!("❌ Error {}:\n{}", status, body),
            PublishOutcome::TransportError(message) => match source {
                PostSource::Manual => format!("⚠️ Error: {}", message),
                PostSource::Generated => format!("Publish error: {}", message),
            },
        }
    }
}
