//! Platform-neutral chat handling.
//!
//! [`ChatHandler`] sits between a messaging transport and the routing
//! engine. It drops bot-authored messages, answers bang commands, ignores
//! messages that are not addressed to the assistant, and records each
//! completed exchange in the [`ConversationStore`].

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info};

use crate::agent::synthesizer::ResponseSynthesizer;
use crate::agent::ResponseEnvelope;
use crate::memory::ConversationStore;

pub mod commands;
pub mod ui;

use commands::{Command, HelpCard, CLEARED_REPLY};

/// Matches `<@123>` and `<@!123>` mention tokens.
const MENTION_PATTERN: &str = r"<@!?\d+>";

/// Text sent to the engine when a message is empty after cleaning.
pub const EMPTY_MESSAGE_STAND_IN: &str = "Hello!";

/// A message as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Opaque sender identifier.
    pub user_id: String,
    /// Raw message text.
    pub text: String,
    /// Whether the message carries files or images.
    pub has_attachment: bool,
    /// Whether the sender is a bot (including this one).
    pub from_bot: bool,
    /// Whether the assistant was mentioned or the channel is private.
    pub addressed: bool,
}

impl InboundMessage {
    /// A message typed directly to the assistant by a human.
    pub fn direct(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
            has_attachment: false,
            from_bot: false,
            addressed: true,
        }
    }
}

/// What to send back to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text.
    Text(String),
    /// The help card.
    Help(HelpCard),
    /// A routed model reply.
    Envelope(ResponseEnvelope),
}

/// Strip mention tokens and surrounding whitespace. Empty results become
/// [`EMPTY_MESSAGE_STAND_IN`].
pub fn clean_content(text: &str) -> String {
    let stripped = match Regex::new(MENTION_PATTERN) {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(_) => text.to_owned(),
    };
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        EMPTY_MESSAGE_STAND_IN.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Dispatches inbound messages to commands or the routing engine.
#[derive(Clone)]
pub struct ChatHandler {
    store: Arc<ConversationStore>,
    engine: Arc<ResponseSynthesizer>,
}

impl ChatHandler {
    /// Create a handler over a shared store and engine.
    pub fn new(store: Arc<ConversationStore>, engine: Arc<ResponseSynthesizer>) -> Self {
        Self { store, engine }
    }

    /// The conversation store.
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Handle one message. `None` means stay silent.
    pub async fn handle(&self, inbound: &InboundMessage) -> Option<Reply> {
        if inbound.from_bot {
            return None;
        }

        if let Some(command) = Command::parse(&inbound.text) {
            debug!(user_id = %inbound.user_id, ?command, "command received");
            return Some(self.run_command(command, &inbound.user_id));
        }

        if !inbound.addressed {
            return None;
        }

        let content = clean_content(&inbound.text);
        let history = self.store.history(&inbound.user_id);
        let envelope = self
            .engine
            .respond(&content, &history, inbound.has_attachment)
            .await;

        self.store
            .append_exchange(&inbound.user_id, &content, &envelope.content);
        info!(
            user_id = %inbound.user_id,
            model = %envelope.model_id,
            stored_turns = self.store.turn_count(&inbound.user_id),
            "reply ready"
        );

        Some(Reply::Envelope(envelope))
    }

    fn run_command(&self, command: Command, user_id: &str) -> Reply {
        match command {
            Command::Clear => {
                self.store.clear(user_id);
                Reply::Text(CLEARED_REPLY.to_owned())
            }
            Command::Help => Reply::Help(commands::handle_help()),
            Command::Time => Reply::Text(commands::handle_time(self.engine.clock())),
        }
    }
}
