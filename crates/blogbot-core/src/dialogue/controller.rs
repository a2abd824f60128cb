//! Drives conversations: sessions in, effects out

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::AllowList;
use crate::llm::{DraftGenerator, GenerationOutcome};
use crate::publish::Publisher;
use crate::session::{ConversationKey, Session, SessionStore};

use super::effect::Effect;
use super::event::{Event, InboundEvent};
use super::message::OutboundMessage;
use super::transition::{Transition, TransitionContext, transition};

/// Owns every active conversation and runs their effects
///
/// One event is handled at a time per conversation: the transport must not
/// call [`handle`](Self::handle) concurrently for the same key. Different
/// conversations may be handled concurrently.
#[derive(Clone)]
pub struct DialogueController {
    allow_list: AllowList,
    sessions: SessionStore,
    publisher: Arc<dyn Publisher>,
    generator: Option<Arc<dyn DraftGenerator>>,
}

impl DialogueController {
    /// Create a controller for the basic (manual-only) flow
    pub fn new(allow_list: AllowList, sessions: SessionStore, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            allow_list,
            sessions,
            publisher,
            generator: None,
        }
    }

    /// Enable the generation path
    pub fn with_generator(mut self, generator: Arc<dyn DraftGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn generation_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// End a conversation whose replies could not be delivered
    ///
    /// Returns whether a session was removed.
    pub fn abandon(&self, key: ConversationKey) -> bool {
        let removed = self.sessions.remove(&key).is_some();
        if removed {
            warn!("Conversation abandoned after failed delivery: {}", key);
        }
        removed
    }

    /// Process one inbound event and return the messages to deliver
    ///
    /// External calls run to completion before this returns. Their failures
    /// come back as replies; nothing here returns an error.
    pub async fn handle(&self, key: ConversationKey, event: InboundEvent) -> Vec<OutboundMessage> {
        let ctx = TransitionContext {
            authorized: self.allow_list.is_authorized(key.user_id),
            generation_enabled: self.generation_enabled(),
        };

        if event == InboundEvent::Start {
            if ctx.authorized {
                info!("Conversation start requested: {}", key);
            } else {
                warn!("Access denied: {}", key);
            }
        }

        let mut session = self.sessions.get(&key);
        let mut state = session.as_ref().map(|s| s.state.clone());
        let mut event = Event::from(event);
        let mut replies = Vec::new();

        loop {
            let Transition { next, effects } = transition(state.take(), event, &ctx);
            state = next;

            let mut follow_up = None;
            for effect in effects {
                match effect {
                    Effect::Send(message) => replies.push(message),
                    Effect::Publish(request) => {
                        debug!("Publishing for {}: slug={}", key, request.slug);
                        let outcome = self.publisher.publish(&request).await;
                        if outcome.is_published() {
                            info!("Post published for {}: slug={}", key, request.slug);
                        }
                        follow_up = Some(Event::Published(outcome));
                    }
                    Effect::Generate { prompt } => {
                        debug!("Generating draft for {} ({} chars)", key, prompt.chars().count());
                        let outcome = match &self.generator {
                            Some(generator) => generator.generate(&prompt).await,
                            None => GenerationOutcome::Failed(
                                "text generation is not configured".to_string(),
                            ),
                        };
                        follow_up = Some(Event::Generated(outcome));
                    }
                }
            }

            match follow_up {
                Some(outcome) => event = outcome,
                None => break,
            }
        }

        match state {
            Some(state) => {
                debug!("{} -> {}", key, state.name());
                let session = match session.take() {
                    Some(mut session) => {
                        session.advance(state);
                        session
                    }
                    None => Session::new(key, state),
                };
                self.sessions.set(session);
            }
            None => {
                if self.sessions.remove(&key).is_some() {
                    info!("Conversation finished: {}", key);
                }
            }
        }

        replies
    }
}
