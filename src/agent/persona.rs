//! Persona prompt template.
//!
//! The persona text is data, not code: it lives in `templates/persona.toml`
//! (compiled in as the default) and can be replaced at startup with a file
//! of the same shape.

use std::path::Path;

use serde::Deserialize;

use super::classifier::TaskCategory;

/// Placeholder in the base block replaced with the formatted current time.
pub const TIME_PLACEHOLDER: &str = "{{current_time}}";

const BUILTIN_PERSONA: &str = include_str!("../../templates/persona.toml");

/// Persona template failures.
#[derive(Debug, thiserror::Error)]
pub enum PersonaError {
    /// The template file could not be read.
    #[error("failed to read persona template {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The template is not valid TOML of the expected shape.
    #[error("invalid persona template: {0}")]
    Parse(#[from] toml::de::Error),
    /// The base block has nowhere to put the current time.
    #[error("persona base block has no current_time placeholder")]
    MissingTimePlaceholder,
}

/// Per-category instruction suffixes. Every field is required, so a loaded
/// template always covers every category.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct Instructions {
    conversational: String,
    code: String,
    reasoning: String,
    speed: String,
    multimodal: String,
}

/// A validated persona template.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonaTemplate {
    base: String,
    instructions: Instructions,
}

impl PersonaTemplate {
    /// The template shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled template is malformed.
    pub fn builtin() -> Result<Self, PersonaError> {
        Self::parse(BUILTIN_PERSONA)
    }

    /// Parse and validate a template from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a complete template or the base
    /// block lacks the time placeholder.
    pub fn parse(text: &str) -> Result<Self, PersonaError> {
        let template: Self = toml::from_str(text)?;
        if !template.base.contains(TIME_PLACEHOLDER) {
            return Err(PersonaError::MissingTimePlaceholder);
        }
        Ok(template)
    }

    /// Load a template from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid template.
    pub fn from_path(path: &Path) -> Result<Self, PersonaError> {
        let text = std::fs::read_to_string(path).map_err(|source| PersonaError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Instruction suffix for a category.
    pub fn instruction(&self, category: TaskCategory) -> &str {
        match category {
            TaskCategory::Conversational => &self.instructions.conversational,
            TaskCategory::Code => &self.instructions.code,
            TaskCategory::Reasoning => &self.instructions.reasoning,
            TaskCategory::Speed => &self.instructions.speed,
            TaskCategory::Multimodal => &self.instructions.multimodal,
        }
    }

    /// Render the full system prompt: base block with the time filled in,
    /// a blank line, then the category instruction.
    pub fn render(&self, category: TaskCategory, formatted_time: &str) -> String {
        let base = self.base.trim().replace(TIME_PLACEHOLDER, formatted_time);
        format!("{base}\n\n{}", self.instruction(category).trim())
    }
}
