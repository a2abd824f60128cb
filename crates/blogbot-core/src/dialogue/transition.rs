//! Pure state transition function
//!
//! Given the same state, event and context it always yields the same
//! result, with no I/O. Events without a matching row leave the
//! conversation untouched.

use crate::llm::GenerationOutcome;
use crate::publish::PublishRequest;
use crate::text::derive_title;

use super::effect::Effect;
use super::event::{Choice, Event, InboundEvent};
use super::message::{OutboundMessage, replies};
use super::state::{DialogueState, PostSource};

/// Facts about the actor and deployment a transition depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionContext {
    /// Actor is on the allow-list
    pub authorized: bool,
    /// A draft generator is configured
    pub generation_enabled: bool,
}

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Next state; `None` means the conversation is over
    pub next: Option<DialogueState>,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: DialogueState) -> Self {
        Self {
            next: Some(state),
            effects: vec![],
        }
    }

    fn end() -> Self {
        Self {
            next: None,
            effects: vec![],
        }
    }

    /// Keep whatever state there was and do nothing
    fn stay(state: Option<DialogueState>) -> Self {
        Self {
            next: state,
            effects: vec![],
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    fn send(self, message: OutboundMessage) -> Self {
        self.with_effect(Effect::Send(message))
    }

    /// Whether the conversation ends with this transition
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }
}

/// Compute the next state and effects for `event`
pub fn transition(
    state: Option<DialogueState>,
    event: Event,
    ctx: &TransitionContext,
) -> Transition {
    use DialogueState as S;
    use InboundEvent as In;

    match (state, event) {
        // Entry point
        (None, Event::Inbound(In::Start)) if !ctx.authorized => {
            Transition::end().send(OutboundMessage::reply(replies::ACCESS_DENIED))
        }
        (None, Event::Inbound(In::Start)) if ctx.generation_enabled => Transition::to(S::SelectMode)
            .send(OutboundMessage::reply(replies::CHOOSE_MODE).with_buttons(replies::mode_buttons())),
        (None, Event::Inbound(In::Start)) => {
            Transition::to(S::TitleInput).send(OutboundMessage::reply(replies::ASK_TITLE))
        }

        // Fallback from any active state
        (Some(_), Event::Inbound(In::Cancel)) => {
            Transition::end().send(OutboundMessage::reply(replies::CANCELLED))
        }

        // Mode selection
        (Some(S::SelectMode), Event::Inbound(In::Callback(data))) => {
            match data.parse::<Choice>() {
                Ok(Choice::Manual) => {
                    Transition::to(S::TitleInput).send(OutboundMessage::edit(replies::ASK_TITLE))
                }
                Ok(Choice::Generate) if ctx.generation_enabled => {
                    Transition::to(S::GenerateInput).send(OutboundMessage::edit(replies::ASK_PROMPT))
                }
                _ => Transition::end(),
            }
        }

        // Manual path
        (Some(S::TitleInput), Event::Inbound(In::Text(title))) => {
            Transition::to(S::BodyInput { title }).send(OutboundMessage::reply(replies::ASK_BODY))
        }
        (Some(S::BodyInput { title }), Event::Inbound(In::Text(body))) => {
            Transition::to(S::Publishing(PostSource::Manual))
                .with_effect(Effect::Publish(PublishRequest::new(title, body)))
        }

        // Generation path
        (Some(S::GenerateInput), Event::Inbound(In::Text(prompt))) => {
            Transition::to(S::Generating {
                prompt: prompt.clone(),
            })
            .with_effect(Effect::Generate { prompt })
        }
        (Some(S::Generating { prompt }), Event::Generated(outcome)) => match outcome {
            GenerationOutcome::Generated(generated) => {
                let draft = OutboundMessage::markdown(&generated)
                    .with_buttons(replies::confirm_buttons());
                Transition::to(S::ConfirmPublish { prompt, generated }).send(draft)
            }
            GenerationOutcome::Failed(message) => Transition::end()
                .send(OutboundMessage::reply(replies::generation_failed(&message))),
        },
        (Some(S::ConfirmPublish { prompt, generated }), Event::Inbound(In::Callback(data))) => {
            if data.parse::<Choice>() == Ok(Choice::Publish) {
                Transition::to(S::Publishing(PostSource::Generated))
                    .with_effect(Effect::Publish(PublishRequest::new(
                        derive_title(&prompt),
                        generated,
                    )))
            } else {
                Transition::end().send(OutboundMessage::edit(replies::DRAFT_DISCARDED))
            }
        }

        // Publish outcome
        (Some(S::Publishing(source)), Event::Published(outcome)) => {
            let text = replies::publish_result(source, &outcome);
            let message = match source {
                PostSource::Manual => OutboundMessage::reply(text),
                PostSource::Generated => OutboundMessage::edit(text),
            };
            Transition::end().send(message)
        }

        // No row for this (state, event) pair
        (state, _) => Transition::stay(state),
    }
}
