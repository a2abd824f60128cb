//! Effects produced by dialogue transitions

use crate::publish::PublishRequest;

use super::message::OutboundMessage;

/// Work to perform after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a message to the user
    Send(OutboundMessage),
    /// Submit a post; the outcome comes back as `Event::Published`
    Publish(PublishRequest),
    /// Draft a post; the outcome comes back as `Event::Generated`
    Generate { prompt: String },
}
