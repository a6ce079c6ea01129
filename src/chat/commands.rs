//! Bang-command handlers.
//!
//! Commands are matched on the raw message prefix, before mention gating,
//! so they work in any channel the bot can read. None of them reach the
//! routing engine.

use serde::Serialize;

use crate::clock::TimeContext;

/// Reply sent after `!clear`.
pub const CLEARED_REPLY: &str = "🗑️ Conversation history cleared!";

/// Color of the help card.
pub const HELP_COLOR: u32 = 0x3498db;

/// A recognised administrative command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `!clear`: forget the sender's conversation.
    Clear,
    /// `!help`: show the capability summary.
    Help,
    /// `!time` or `!bdtime`: show the current Dhaka time.
    Time,
}

impl Command {
    /// Recognise a command by message prefix.
    pub fn parse(text: &str) -> Option<Self> {
        if text.starts_with("!clear") {
            Some(Self::Clear)
        } else if text.starts_with("!help") {
            Some(Self::Help)
        } else if text.starts_with("!time") || text.starts_with("!bdtime") {
            Some(Self::Time)
        } else {
            None
        }
    }
}

/// One labelled field of the help card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpField {
    /// Field heading.
    pub name: &'static str,
    /// Field body.
    pub value: &'static str,
    /// Whether the field may share a row with its neighbours.
    pub inline: bool,
}

/// Static capability summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpCard {
    /// RGB panel color.
    pub color: u32,
    /// Card title.
    pub title: &'static str,
    /// Card description.
    pub description: &'static str,
    /// Capability and command fields.
    pub fields: Vec<HelpField>,
}

/// Build the help card.
pub fn handle_help() -> HelpCard {
    let capability = |name, value| HelpField {
        name,
        value,
        inline: true,
    };

    HelpCard {
        color: HELP_COLOR,
        title: "🤖 Wren Ford - Personal Assistant",
        description: "I am Wren Ford, Sir Abdul Mukit's personal assistant and advisor. \
                      I am here to serve and guide you with wisdom and loyalty.",
        fields: vec![
            capability(
                "💬 Natural Conversation",
                "Engage in thoughtful dialogue and receive guidance",
            ),
            capability(
                "💻 Technical Assistance",
                "Programming, debugging, and technical solutions",
            ),
            capability(
                "🧠 Strategic Analysis",
                "Complex problem solving and business strategy",
            ),
            capability("⚡ Quick Responses", "Fast answers to immediate questions"),
            capability(
                "📄 Document Analysis",
                "Review files, images, and documents",
            ),
            HelpField {
                name: "🔧 Commands",
                value: "`!clear` - Clear conversation\n\
                        `!help` - Show this help\n\
                        `!time` or `!bdtime` - Show Bangladesh time",
                inline: false,
            },
        ],
    }
}

/// Current Dhaka time and day period.
pub fn handle_time(clock: &TimeContext) -> String {
    format!(
        "🇧🇩 {}\n🌅 It's currently **{}** in Dhaka.",
        clock.formatted_time(),
        clock.day_period()
    )
}
