//! Events consumed by the dialogue

use std::fmt;
use std::str::FromStr;

use crate::llm::GenerationOutcome;
use crate::publish::PublishOutcome;

/// Button tags understood by the dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Manual,
    Generate,
    Publish,
    Cancel,
}

impl Choice {
    /// Callback tag carried by the button
    pub fn tag(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Generate => "generate",
            Self::Publish => "publish",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "generate" => Ok(Self::Generate),
            "publish" => Ok(Self::Publish),
            "cancel" => Ok(Self::Cancel),
            other => Err(format!("unknown choice: {}", other)),
        }
    }
}

/// Event coming from the chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `/start` command
    Start,
    /// `/cancel` command
    Cancel,
    /// Plain text message
    Text(String),
    /// Button press with its raw callback tag
    Callback(String),
}

impl InboundEvent {
    /// Button press for a known choice
    pub fn choice(choice: Choice) -> Self {
        Self::Callback(choice.tag().to_string())
    }
}

/// Everything the transition function reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Inbound(InboundEvent),
    /// Outcome of a publish effect
    Published(PublishOutcome),
    /// Outcome of a generate effect
    Generated(GenerationOutcome),
}

impl From<InboundEvent> for Event {
    fn from(event: InboundEvent) -> Self {
        Self::Inbound(event)
    }
}
