//! Completion provider abstraction layer.
//!
//! Defines the [`LlmProvider`] trait and the shared request/response types
//! the routing engine speaks. The only shipped implementation is
//! [`openrouter::OpenRouterProvider`], an OpenAI-compatible
//! `/chat/completions` client.
//!
//! Providers perform exactly one HTTP round trip per call. Retries, fallback
//! text and user-visible error wording are the engine's business, not theirs.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod openrouter;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Conversation participant role on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona / instruction message.
    System,
    /// Human user message.
    User,
    /// Assistant (model) message.
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A message sent to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,
    /// Plain text content.
    pub content: String,
}

impl Message {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response
// ---------------------------------------------------------------------------

/// A single chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Backend model identifier (e.g. `qwen/qwen3-14b:free`).
    pub model: String,
    /// Full message sequence: persona prompt, trimmed history, new user turn.
    pub messages: Vec<Message>,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Maximum tokens in the completion.
    pub max_tokens: u32,
}

/// The parsed result of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Text of the first returned choice, when there was one with content.
    pub text: Option<String>,
    /// Model that served the response, if the provider reported it.
    pub model: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by completion providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match expected schema.
    #[error("provider response parse error: {0}")]
    Parse(String),
    /// Upstream provider responded with an error status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// The call did not finish within the configured wait.
    #[error("provider call timed out after {secs}s")]
    Timeout {
        /// Configured bound in seconds.
        secs: u64,
    },
    /// No API credential was configured for the provider.
    #[error("missing credential: {key}")]
    MissingCredential {
        /// Name of the missing credential.
        key: String,
    },
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure, `ProviderError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

/// Collapse whitespace, redact key-shaped tokens and cap the length of an
/// upstream error body before it is stored in an error value.
pub fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"sk-or-v1-[A-Za-z0-9]{16,}",
        r"sk-ant-[A-Za-z0-9_\-]{10,}",
        r"sk-[A-Za-z0-9]{32,}",
        r"Bearer\s+[A-Za-z0-9_\-\.]{16,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Core completion provider interface.
///
/// Implementations must be `Send + Sync` so one provider can serve
/// concurrent requests from different users.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Request a single completion. No retries.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on network, status, credential or parse failure.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Short provider name used in logs.
    fn name(&self) -> &str;
}
