//! Keyword-based task classification.
//!
//! Rules are checked in a fixed order and the first match wins:
//! attachment, code, reasoning, speed (keyword or short message), then
//! conversational. A message like "quickly debug this algorithm" carries
//! both code and speed cues and routes to code because code is checked
//! first.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Messages shorter than this many characters count as speed tasks.
pub const SHORT_MESSAGE_CHARS: usize = 50;

const CODE_KEYWORDS: &[&str] = &[
    "code",
    "programming",
    "function",
    "script",
    "debug",
    "error",
    "syntax",
    "javascript",
    "python",
    "java",
    "html",
    "css",
    "react",
    "node",
    "api",
    "database",
    "sql",
    "git",
    "github",
    "algorithm",
    "data structure",
    "compile",
    "runtime",
    "framework",
    "library",
    "package",
    "install",
];

const REASONING_KEYWORDS: &[&str] = &[
    "analyze",
    "calculate",
    "solve",
    "logic",
    "reasoning",
    "strategy",
    "plan",
    "step by step",
    "problem",
    "math",
    "equation",
    "proof",
    "research",
    "compare",
    "evaluate",
    "decision",
    "pros and cons",
    "complex",
    "detailed analysis",
    "breakdown",
    "methodology",
];

const SPEED_KEYWORDS: &[&str] = &[
    "quick",
    "fast",
    "simple",
    "brief",
    "short",
    "yes or no",
    "define",
    "what is",
    "who is",
    "when",
    "where",
    "translate",
    "convert",
    "list",
    "name",
    "tell me",
    "explain briefly",
];

/// The task category that decides which model profile serves a message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// Natural dialogue. The fallback when nothing else matches.
    #[default]
    Conversational,
    /// Programming and technical help.
    Code,
    /// Analysis, planning and multi-step problems.
    Reasoning,
    /// Short factual questions and quick lookups.
    Speed,
    /// Messages that carry an attachment.
    Multimodal,
}

impl TaskCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Conversational,
        Self::Code,
        Self::Reasoning,
        Self::Speed,
        Self::Multimodal,
    ];

    /// Lower-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conversational => "conversational",
            Self::Code => "code",
            Self::Reasoning => "reasoning",
            Self::Speed => "speed",
            Self::Multimodal => "multimodal",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a message into exactly one task category.
pub fn classify(message: &str, has_attachment: bool) -> TaskCategory {
    if has_attachment {
        return TaskCategory::Multimodal;
    }

    let lower = message.to_lowercase();
    let is_short = message.chars().count() < SHORT_MESSAGE_CHARS;
    if contains_any(&lower, CODE_KEYWORDS) {
        TaskCategory::Code
    } else if contains_any(&lower, REASONING_KEYWORDS) {
        TaskCategory::Reasoning
    } else if contains_any(&lower, SPEED_KEYWORDS) || is_short {
        TaskCategory::Speed
    } else {
        TaskCategory::Conversational
    }
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
