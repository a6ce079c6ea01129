//! Bounded per-user conversation memory.
//!
//! The [`ConversationStore`] keeps at most `window` turns for each user, in
//! conversation order, for the lifetime of the process. There is no
//! persistence and no eviction other than front-truncation and explicit
//! [`ConversationStore::clear`].
//!
//! Operations on different users never interfere. Operations on the same
//! user are individually atomic but not serialised across a request: two
//! messages from one user in flight at once may both read the same history
//! and append in either order. That is last-write-wins by design of the
//! hosting loop, not something the store tries to prevent.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::{Message, Role};

/// Default number of turns retained per user.
pub const DEFAULT_WINDOW: usize = 10;

/// Author of a stored turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The human user.
    User,
    /// The assistant.
    Assistant,
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who wrote it.
    pub role: TurnRole,
    /// Text content.
    pub content: String,
}

impl Turn {
    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// An assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Message {
            role: match turn.role {
                TurnRole::User => Role::User,
                TurnRole::Assistant => Role::Assistant,
            },
            content: turn.content.clone(),
        }
    }
}

/// In-process store of per-user conversation histories.
#[derive(Debug)]
pub struct ConversationStore {
    window: usize,
    conversations: RwLock<HashMap<String, VecDeque<Turn>>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl ConversationStore {
    /// Create an empty store retaining at most `window` turns per user.
    /// A zero window is treated as one.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            conversations: RwLock::new(HashMap::new()),
        }
    }

    /// Maximum turns retained per user.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Append a turn, creating the user's history on first use and dropping
    /// the oldest turns beyond the window.
    pub fn append(&self, user_id: &str, role: TurnRole, content: impl Into<String>) {
        let mut conversations = self.write();
        let history = conversations.entry(user_id.to_owned()).or_default();
        history.push_back(Turn {
            role,
            content: content.into(),
        });
        while history.len() > self.window {
            history.pop_front();
        }
    }

    /// Record a completed exchange: the user's message, then the reply.
    pub fn append_exchange(&self, user_id: &str, user_text: &str, assistant_text: &str) {
        self.append(user_id, TurnRole::User, user_text);
        self.append(user_id, TurnRole::Assistant, assistant_text);
    }

    /// Snapshot of the user's history, oldest first. Empty for unknown users.
    pub fn history(&self, user_id: &str) -> Vec<Turn> {
        self.read()
            .get(user_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of turns stored for the user.
    pub fn turn_count(&self, user_id: &str) -> usize {
        self.read().get(user_id).map_or(0, VecDeque::len)
    }

    /// Remove the user's history entirely.
    pub fn clear(&self, user_id: &str) {
        if self.write().remove(user_id).is_some() {
            debug!(user_id, "conversation cleared");
        }
    }

    /// Users that currently have stored turns.
    pub fn active_users(&self) -> BTreeSet<String> {
        self.read()
            .iter()
            .filter(|(_, history)| !history.is_empty())
            .map(|(user_id, _)| user_id.clone())
            .collect()
    }

    // Mutations are single push/pop/remove steps; a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, VecDeque<Turn>>> {
        self.conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, VecDeque<Turn>>> {
        self.conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
