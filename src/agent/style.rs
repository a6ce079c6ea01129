//! Response-style tagging for display metadata.
//!
//! The tag only decorates the rendered reply. It never influences routing.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classifier::contains_any;

const QUESTION_PREFIXES: &[&str] = &[
    "what",
    "how",
    "why",
    "when",
    "where",
    "who",
    "can you",
    "could you",
];

const ADVICE_MARKERS: &[&str] = &[
    "advice",
    "suggest",
    "recommend",
    "should i",
    "what do you think",
];

const EXPLANATION_MARKERS: &[&str] = &["tell me", "explain", "describe", "statement", "opinion"];

/// How a reply relates to the message that prompted it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    /// The user asked a question.
    Questioned,
    /// The user asked for advice.
    Advised,
    /// The user asked for an explanation or statement.
    Statemented,
    /// Anything else.
    #[default]
    Answered,
}

impl ResponseStyle {
    /// Lower-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Questioned => "questioned",
            Self::Advised => "advised",
            Self::Statemented => "statemented",
            Self::Answered => "answered",
        }
    }
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag a message with a response style. First matching rule wins.
pub fn style_of(message: &str) -> ResponseStyle {
    let lower = message.to_lowercase();

    if lower.contains('?')
        || QUESTION_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
    {
        ResponseStyle::Questioned
    } else if contains_any(&lower, ADVICE_MARKERS) {
        ResponseStyle::Advised
    } else if contains_any(&lower, EXPLANATION_MARKERS) {
        ResponseStyle::Statemented
    } else {
        ResponseStyle::Answered
    }
}
