//! OpenRouter provider using the OpenAI-compatible `/chat/completions` API.

use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;

use super::{
    check_http_response, CompletionRequest, CompletionResponse, LlmProvider, ProviderError,
};

/// Environment key holding the OpenRouter API credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Chat completions request body.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Backend model identifier.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum completion tokens.
    pub max_tokens: u32,
}

/// A message in chat-completions format.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role (`system`, `user`, `assistant`).
    pub role: String,
    /// Text content.
    pub content: String,
}

/// Chat completions response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Response choices.
    pub choices: Vec<ChatChoice>,
    /// Model that served the response.
    #[serde(default)]
    pub model: Option<String>,
}

/// A single response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// Assistant message for this choice.
    #[serde(default)]
    pub message: Option<ChatResponseMessage>,
}

/// Assistant message inside a choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    /// Optional text content.
    #[serde(default)]
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// OpenRouter chat completions provider.
#[derive(Clone)]
pub struct OpenRouterProvider {
    endpoint: String,
    api_key: Option<String>,
    site_url: String,
    site_name: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenRouterProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .finish()
    }
}

impl OpenRouterProvider {
    /// Create a provider from resolved provider settings and an optional key.
    ///
    /// A missing key is not fatal here; every call then fails with
    /// [`ProviderError::MissingCredential`].
    pub fn new(config: &ProviderConfig, api_key: Option<String>) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            site_url: config.site_url.clone(),
            site_name: config.site_name.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// The endpoint this provider posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build the wire request from a completion request.
#[doc(hidden)]
pub fn build_request(request: &CompletionRequest) -> ChatRequest {
    ChatRequest {
        model: request.model.clone(),
        messages: request
            .messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.as_str().to_owned(),
                content: m.content.clone(),
            })
            .collect(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

/// Parse a chat-completions response body.
///
/// An empty `choices` list or a choice without content yields
/// `text: None`; a body without `choices` at all is a parse error.
///
/// # Errors
///
/// Returns `ProviderError::Parse` if the body cannot be deserialized.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<CompletionResponse, ProviderError> {
    let resp: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let text = resp
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|text| !text.is_empty());

    Ok(CompletionResponse {
        text,
        model: resp.model,
    })
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingCredential {
                key: API_KEY_ENV.to_owned(),
            })?;
        let api_request = build_request(&request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {api_key}"))
            .header("http-referer", &self.site_url)
            .header("x-title", &self.site_name)
            .json(&api_request)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload)
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}
