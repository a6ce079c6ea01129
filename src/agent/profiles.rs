//! Model profile registry: one backend configuration per task category.
//!
//! The table is indexed by [`TaskCategory`] through exhaustive matches, so
//! adding a category without a profile is a compile error rather than a
//! runtime fallback.

use std::collections::BTreeMap;

use tracing::info;

use super::classifier::TaskCategory;
use super::persona::PersonaTemplate;

/// Immutable backend configuration for one task category.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfile {
    /// Category this profile serves.
    pub category: TaskCategory,
    /// Provider-side model identifier.
    pub backend_model_id: String,
    /// Human-readable model name.
    pub display_name: &'static str,
    /// RGB color used for the reply panel.
    pub display_color: u32,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Completion token cap.
    pub max_output_tokens: u32,
    /// One-line role description.
    pub description: &'static str,
}

/// Reserved profile for replies produced when the provider call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorProfile {
    /// Model id reported in the envelope.
    pub model_id: &'static str,
    /// RGB color used for the reply panel.
    pub display_color: u32,
}

/// The error profile.
pub const ERROR_PROFILE: ErrorProfile = ErrorProfile {
    model_id: "error",
    display_color: 0x95a5a6,
};

fn builtin_profile(category: TaskCategory) -> ModelProfile {
    let (model_id, display_name, display_color, temperature, max_output_tokens, description) =
        match category {
            TaskCategory::Conversational => (
                "deepseek/deepseek-chat-v3-0324:free",
                "DeepSeek V3 0324",
                0x3498db,
                0.8,
                1500,
                "Smooth Conversationalist",
            ),
            TaskCategory::Code => (
                "qwen/qwen3-14b:free",
                "Qwen 3 14B",
                0xe74c3c,
                0.3,
                2000,
                "Technical & Code Wizard",
            ),
            TaskCategory::Reasoning => (
                "moonshotai/kimi-vl-a3b-thinking:free",
                "MoonshotAI Kimi VL",
                0x9b59b6,
                0.4,
                2500,
                "Deep Reasoner",
            ),
            TaskCategory::Speed => (
                "mistralai/mistral-small-3.1-24b-instruct:free",
                "Mistral Small 3.1 24B",
                0xf39c12,
                0.2,
                500,
                "Speed Demon",
            ),
            TaskCategory::Multimodal => (
                "qwen/qwen2.5-vl-3b-instruct:free",
                "Qwen 2.5 VL 3B",
                0x27ae60,
                0.6,
                2000,
                "Multimodal Master",
            ),
        };

    ModelProfile {
        category,
        backend_model_id: model_id.to_owned(),
        display_name,
        display_color,
        temperature,
        max_output_tokens,
        description,
    }
}

/// Read-only lookup from task category to model profile and persona prompt.
#[derive(Debug, Clone)]
pub struct ModelProfileRegistry {
    conversational: ModelProfile,
    code: ModelProfile,
    reasoning: ModelProfile,
    speed: ModelProfile,
    multimodal: ModelProfile,
    persona: PersonaTemplate,
}

impl ModelProfileRegistry {
    /// Registry with the built-in profile table and the given persona.
    pub fn new(persona: PersonaTemplate) -> Self {
        Self {
            conversational: builtin_profile(TaskCategory::Conversational),
            code: builtin_profile(TaskCategory::Code),
            reasoning: builtin_profile(TaskCategory::Reasoning),
            speed: builtin_profile(TaskCategory::Speed),
            multimodal: builtin_profile(TaskCategory::Multimodal),
            persona,
        }
    }

    /// Replace backend model ids for the listed categories. Colors, sampling
    /// settings and descriptions stay as built in.
    pub fn with_backend_overrides(mut self, overrides: &BTreeMap<TaskCategory, String>) -> Self {
        for (category, model_id) in overrides {
            let profile = self.profile_mut(*category);
            info!(
                category = %category,
                from = %profile.backend_model_id,
                to = %model_id,
                "backend model overridden"
            );
            profile.backend_model_id.clone_from(model_id);
        }
        self
    }

    /// Profile serving `category`.
    pub fn profile_for(&self, category: TaskCategory) -> &ModelProfile {
        match category {
            TaskCategory::Conversational => &self.conversational,
            TaskCategory::Code => &self.code,
            TaskCategory::Reasoning => &self.reasoning,
            TaskCategory::Speed => &self.speed,
            TaskCategory::Multimodal => &self.multimodal,
        }
    }

    /// System prompt for `category` with the current time filled in.
    pub fn persona_prompt(&self, category: TaskCategory, formatted_time: &str) -> String {
        self.persona.render(category, formatted_time)
    }

    /// All profiles in category declaration order.
    pub fn profiles(&self) -> impl Iterator<Item = &ModelProfile> {
        TaskCategory::ALL
            .into_iter()
            .map(move |category| self.profile_for(category))
    }

    fn profile_mut(&mut self, category: TaskCategory) -> &mut ModelProfile {
        match category {
            TaskCategory::Conversational => &mut self.conversational,
            TaskCategory::Code => &mut self.code,
            TaskCategory::Reasoning => &mut self.reasoning,
            TaskCategory::Speed => &mut self.speed,
            TaskCategory::Multimodal => &mut self.multimodal,
        }
    }
}
