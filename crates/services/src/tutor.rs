//! AI tutor chat: remote provider with canned fallback.
//!
//! The tutor consumes the session's context string and returns free text; it
//! never feeds back into step state. Provider selection is configuration:
//! with an API key in the environment the remote provider is tried first and
//! the canned provider covers failures, without a key the canned provider
//! answers alone.

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use lesson_core::model::LanguageError;

use crate::error::TutorError;
use crate::sessions::{LessonSession, StepStamp};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct TutorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl TutorConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LESSON_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("LESSON_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("LESSON_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

//
// ─── PROVIDERS ─────────────────────────────────────────────────────────────────
//

/// A source of tutor answers.
#[async_trait]
pub trait TutorProvider: Send + Sync {
    /// Answer a learner question given the current step context.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` when the provider cannot produce an answer.
    async fn reply(&self, query: &str, context: &str) -> Result<String, TutorError>;
}

/// Tutor backed by an OpenAI-compatible chat endpoint.
#[derive(Clone)]
pub struct RemoteProvider {
    client: Client,
    config: TutorConfig,
}

impl RemoteProvider {
    #[must_use]
    pub fn new(config: TutorConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl TutorProvider for RemoteProvider {
    async fn reply(&self, query: &str, context: &str) -> Result<String, TutorError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let prompt = format!(
            "Context: {context}\n\nUser Question: {query}\n\nAnswer as a helpful vocational tutor."
        );
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TutorError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(TutorError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

/// Keyword-matched canned replies, used without an API key and as the
/// fallback when the remote provider fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedProvider;

const CANNED_STATOR: &str =
    "The stator is the stationary part. It usually holds the field coils or permanent magnets.";
const CANNED_ROTOR: &str =
    "The rotor is the moving part. It connects to the output shaft to do mechanical work.";
const CANNED_WIRING: &str = "In household wiring, the Phase (Live) wire carries the current, and \
    the Neutral wire provides the return path. Always ensure the switch is on the Phase wire.";
const CANNED_SAFETY: &str = "Safety first! Always ensure the power source is disconnected before \
    touching any bare wires.";
const CANNED_MOTOR: &str = "The motor consists of a stator and a rotor. The interaction between \
    their magnetic fields produces force.";

impl CannedProvider {
    #[must_use]
    pub fn answer(self, query: &str, context: &str) -> String {
        let lower = query.to_lowercase();
        if lower.contains("stator") {
            return CANNED_STATOR.to_string();
        }
        if lower.contains("rotor") {
            return CANNED_ROTOR.to_string();
        }
        if lower.contains("wire") || lower.contains("phase") {
            return CANNED_WIRING.to_string();
        }
        if lower.contains("safe") || lower.contains("shock") {
            return CANNED_SAFETY.to_string();
        }
        if context.contains("Motor") {
            return CANNED_MOTOR.to_string();
        }
        format!(
            "That's a great question about \"{query}\". Based on the current step: {context}, \
             make sure you align the components correctly. Need a specific hint?"
        )
    }
}

#[async_trait]
impl TutorProvider for CannedProvider {
    async fn reply(&self, query: &str, context: &str) -> Result<String, TutorError> {
        Ok(self.answer(query, context))
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// A tutor answer tied to the step it was asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorReply {
    pub text: String,
    stamp: StepStamp,
}

impl TutorReply {
    /// True while the session still shows the step this reply was issued
    /// for. A stale reply should be dropped, not rendered.
    #[must_use]
    pub fn is_current_for(&self, session: &LessonSession) -> bool {
        self.stamp == session.stamp()
    }
}

/// Remote-if-configured tutor with canned fallback.
#[derive(Clone)]
pub struct TutorService {
    remote: Option<RemoteProvider>,
    canned: CannedProvider,
}

impl TutorService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(TutorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<TutorConfig>) -> Self {
        Self {
            remote: config.map(RemoteProvider::new),
            canned: CannedProvider,
        }
    }

    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Answer a learner question about the session's current step.
    ///
    /// The reply carries the step stamp captured now; compare with
    /// [`TutorReply::is_current_for`] before rendering, since the step may
    /// have changed while the request was in flight.
    ///
    /// # Errors
    ///
    /// Returns `LanguageError::Unsupported` if the session language is not
    /// declared by the catalog.
    pub async fn ask(
        &self,
        query: &str,
        session: &LessonSession,
    ) -> Result<TutorReply, LanguageError> {
        let context = session.tutor_context(session.language())?;
        let stamp = session.stamp();

        let text = match &self.remote {
            Some(remote) => match remote.reply(query, &context).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!("remote tutor failed, falling back to canned replies: {}", err);
                    self.canned.answer(query, &context)
                }
            },
            None => self.canned.answer(query, &context),
        };

        Ok(TutorReply { text, stamp })
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
