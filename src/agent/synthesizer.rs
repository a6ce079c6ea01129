//! The routing engine: classify, pick a profile, call the provider once,
//! and normalise whatever comes back into a [`ResponseEnvelope`].
//!
//! Routing and envelope construction are synchronous. The provider call is
//! the only await point and the only place a failure can arise; it is
//! bounded by a timeout and every error is mapped to the technical-difficulty
//! envelope right there.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::TimeContext;
use crate::memory::Turn;
use crate::providers::{CompletionRequest, CompletionResponse, LlmProvider, ProviderError};

use super::classifier::{classify, TaskCategory};
use super::context::assemble_messages;
use super::profiles::ModelProfileRegistry;
use super::style::{style_of, ResponseStyle};
use super::ResponseEnvelope;

/// Reply used when the provider answered but produced no text.
pub const EMPTY_COMPLETION_REPLY: &str =
    "I apologize, but I'm having difficulty generating a response right now, Sir.";

/// Reply used when the provider call failed for any reason.
pub const TECHNICAL_DIFFICULTY_REPLY: &str =
    "I encountered a technical difficulty, Sir. Please allow me a moment to resolve this.";

/// A fully routed message, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedRequest {
    /// Category chosen by the classifier.
    pub category: TaskCategory,
    /// Display color of the selected profile.
    pub display_color: u32,
    /// Style tag of the user message.
    pub response_style: ResponseStyle,
    /// The provider request.
    pub request: CompletionRequest,
}

impl RoutedRequest {
    fn into_envelope(
        self,
        completion: CompletionResponse,
        clock: &TimeContext,
    ) -> ResponseEnvelope {
        let content = completion
            .text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| EMPTY_COMPLETION_REPLY.to_owned());
        ResponseEnvelope {
            content,
            model_id: self.request.model,
            color: self.display_color,
            response_style: self.response_style,
            time_of_day: clock.day_period(),
        }
    }
}

/// Stateless response engine. Cheap to share behind an `Arc`.
pub struct ResponseSynthesizer {
    provider: Arc<dyn LlmProvider>,
    registry: Arc<ModelProfileRegistry>,
    clock: TimeContext,
    call_timeout: Duration,
}

impl ResponseSynthesizer {
    /// Create an engine.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        registry: Arc<ModelProfileRegistry>,
        clock: TimeContext,
        call_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            registry,
            clock,
            call_timeout,
        }
    }

    /// The clock in use.
    pub fn clock(&self) -> &TimeContext {
        &self.clock
    }

    /// Route a message without calling the provider.
    pub fn route(
        &self,
        user_message: &str,
        history: &[Turn],
        has_attachment: bool,
    ) -> RoutedRequest {
        let category = classify(user_message, has_attachment);
        let profile = self.registry.profile_for(category);
        let system_prompt = self
            .registry
            .persona_prompt(category, &self.clock.formatted_time());

        RoutedRequest {
            category,
            display_color: profile.display_color,
            response_style: style_of(user_message),
            request: CompletionRequest {
                model: profile.backend_model_id.clone(),
                messages: assemble_messages(system_prompt, history, user_message),
                temperature: profile.temperature,
                max_tokens: profile.max_output_tokens,
            },
        }
    }

    /// Produce a reply envelope. Never fails: provider errors are logged and
    /// turned into the technical-difficulty envelope.
    pub async fn respond(
        &self,
        user_message: &str,
        history: &[Turn],
        has_attachment: bool,
    ) -> ResponseEnvelope {
        let request_id = Uuid::new_v4();
        let routed = self.route(user_message, history, has_attachment);
        info!(
            %request_id,
            category = %routed.category,
            model = %routed.request.model,
            context_messages = routed.request.messages.len(),
            "routing message"
        );

        match self.invoke(routed.request.clone()).await {
            Ok(completion) => {
                debug!(%request_id, served_by = ?completion.model, "completion received");
                routed.into_envelope(completion, &self.clock)
            }
            Err(e) => {
                warn!(
                    %request_id,
                    provider = self.provider.name(),
                    error = %e,
                    "provider call failed"
                );
                ResponseEnvelope::technical_difficulty(self.clock.day_period())
            }
        }
    }

    async fn invoke(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        match tokio::time::timeout(self.call_timeout, self.provider.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                secs: self.call_timeout.as_secs(),
            }),
        }
    }
}
