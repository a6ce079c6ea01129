//! Conversation context assembly for a single completion call.

use crate::memory::Turn;
use crate::providers::Message;

/// Maximum history turns forwarded to the provider.
pub const CONTEXT_TURNS: usize = 10;

/// The most recent `limit` turns of `history`, in original order.
pub fn recent_turns(history: &[Turn], limit: usize) -> &[Turn] {
    let start = history.len().saturating_sub(limit);
    &history[start..]
}

/// Build the provider message sequence: system prompt, the last
/// [`CONTEXT_TURNS`] history turns, then the new user message.
pub fn assemble_messages(
    system_prompt: String,
    history: &[Turn],
    user_message: &str,
) -> Vec<Message> {
    let recent = recent_turns(history, CONTEXT_TURNS);

    let mut messages = Vec::with_capacity(recent.len().saturating_add(2));
    messages.push(Message::system(system_prompt));
    messages.extend(recent.iter().map(Message::from));
    messages.push(Message::user(user_message));
    messages
}
