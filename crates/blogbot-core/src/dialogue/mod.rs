//! Publishing dialogue
//!
//! The conversation is an explicit state machine. [`transition`] is pure:
//! it maps the current state and an event to the next state plus a list of
//! [`Effect`]s. [`DialogueController`] owns the sessions, runs the effects
//! against the publish and generation clients and feeds their outcomes back
//! in as events.

mod controller;
mod effect;
mod event;
mod message;
mod state;
mod transition;

pub use controller::DialogueController;
pub use effect::Effect;
pub use event::{Choice, Event, InboundEvent};
pub use message::{Button, Delivery, OutboundMessage, TextFormat, replies};
pub use state::{DialogueState, PostSource};
pub use transition::{Transition, TransitionContext, transition};
