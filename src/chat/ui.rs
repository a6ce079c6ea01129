//! Plain-text rendering of replies for terminal output.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::agent::ResponseEnvelope;

use super::commands::HelpCard;

/// Format an RGB value as `#rrggbb`.
pub fn format_color(color: u32) -> String {
    format!("#{:06x}", color & 0x00ff_ffff)
}

/// Footer line: `"{style} • {period}"`.
pub fn footer(envelope: &ResponseEnvelope) -> String {
    format!("{} • {}", envelope.response_style, envelope.time_of_day)
}

/// Render an envelope as a color-tagged panel with footer and timestamp.
pub fn render_envelope(envelope: &ResponseEnvelope, sent_at: DateTime<Utc>) -> String {
    format!(
        "▌ {color} {model}\n{content}\n— {footer} · {timestamp}",
        color = format_color(envelope.color),
        model = envelope.model_id,
        content = envelope.content,
        footer = footer(envelope),
        timestamp = sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Render the help card.
pub fn render_help(card: &HelpCard) -> String {
    let mut lines = vec![
        format!("▌ {} {}", format_color(card.color), card.title),
        card.description.to_owned(),
        String::new(),
    ];
    for field in &card.fields {
        lines.push(field.name.to_owned());
        lines.extend(field.value.lines().map(|line| format!("  {line}")));
    }
    lines.join("\n")
}
