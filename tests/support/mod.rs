//! Shared test doubles.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use wren::agent::persona::PersonaTemplate;
use wren::agent::profiles::ModelProfileRegistry;
use wren::agent::synthesizer::ResponseSynthesizer;
use wren::clock::TimeContext;
use wren::providers::{CompletionRequest, CompletionResponse, LlmProvider, ProviderError};

/// What the scripted provider does when called.
#[derive(Debug, Clone)]
pub enum Script {
    /// Succeed with this first-choice text (or none).
    Reply(Option<String>),
    /// Fail with a non-success status.
    Status(u16),
    /// Fail with an unparseable body.
    Malformed,
    /// Never complete.
    Hang,
}

/// In-process provider that follows a script and records every request.
pub struct ScriptedProvider {
    script: Script,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Script::Reply(Some(text.to_owned())))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.requests.lock().expect("requests lock").push(request);
        match &self.script {
            Script::Reply(text) => Ok(CompletionResponse {
                text: text.clone(),
                model: None,
            }),
            Script::Status(status) => Err(ProviderError::HttpStatus {
                status: *status,
                body: "upstream unavailable".to_owned(),
            }),
            Script::Malformed => Err(ProviderError::Parse("expected value".to_owned())),
            Script::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// 15:45 in Dhaka on 2026-10-16 (afternoon).
pub fn afternoon_clock() -> TimeContext {
    let instant = Utc
        .with_ymd_and_hms(2026, 10, 16, 9, 45, 0)
        .single()
        .expect("valid instant");
    TimeContext::pinned_at(instant)
}

pub fn registry() -> Arc<ModelProfileRegistry> {
    let persona = PersonaTemplate::builtin().expect("bundled persona should parse");
    Arc::new(ModelProfileRegistry::new(persona))
}

pub fn engine_with(provider: Arc<dyn LlmProvider>) -> ResponseSynthesizer {
    ResponseSynthesizer::new(
        provider,
        registry(),
        afternoon_clock(),
        Duration::from_secs(5),
    )
}
