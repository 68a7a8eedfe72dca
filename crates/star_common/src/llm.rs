//! Text-generation client.
//!
//! Wraps one OpenAI-compatible chat-completion capability behind a backend
//! trait, with the two operations the journal needs on top: rewriting a
//! STAR answer and generating interview questions from a job description.
//!
//! The HTTP call is blocking, with no timeout and no retry: one user
//! action is one synchronous request, and a stalled backend stalls the
//! action.

use crate::config::LlmSettings;
use crate::error::StarError;
use crate::filter::{clean_line, DefaultQuestionFilter, QuestionFilter};
use crate::prompts;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, info};

/// A single role-tagged message in a chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completion backend: role-tagged messages in, one text out.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String, StarError>;
}

/// OpenAI-compatible HTTP backend.
pub struct HttpOpenAiBackend {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl HttpOpenAiBackend {
    /// Build the backend from settings. Fails with a configuration error
    /// when the API key environment variable is missing or empty; the
    /// generation capability is unusable until that is fixed.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, StarError> {
        let api_key = match env::var(&settings.api_key_env) {
            Ok(key) if !key.is_empty() => key,
            Ok(_) => {
                return Err(StarError::Configuration(format!(
                    "API key env var {} is empty",
                    settings.api_key_env
                )))
            }
            Err(_) => {
                return Err(StarError::Configuration(format!(
                    "API key env var {} not set",
                    settings.api_key_env
                )))
            }
        };

        // No client-side timeout: the caller waits for completion or failure.
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| StarError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

impl CompletionBackend for HttpOpenAiBackend {
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String, StarError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": max_tokens,
        });

        debug!(model = %self.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .map_err(|e| StarError::Upstream(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(StarError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        let response_json: serde_json::Value = response
            .json()
            .map_err(|e| StarError::Upstream(format!("Failed to parse response: {}", e)))?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| StarError::Upstream("No content in response".to_string()))?
            .to_string();

        Ok(content)
    }
}

/// High-level client for the journal's two text operations.
pub struct TextGenClient {
    backend: Box<dyn CompletionBackend>,
    filter: Box<dyn QuestionFilter>,
    max_tokens: u32,
}

impl TextGenClient {
    /// Client over the HTTP backend described by `settings`.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, StarError> {
        Ok(Self::with_backend(
            Box::new(HttpOpenAiBackend::from_settings(settings)?),
            settings.max_tokens,
        ))
    }

    /// Client over an arbitrary backend, with the default question filter.
    pub fn with_backend(backend: Box<dyn CompletionBackend>, max_tokens: u32) -> Self {
        Self {
            backend,
            filter: Box::new(DefaultQuestionFilter),
            max_tokens,
        }
    }

    /// Swap the question quality gate.
    pub fn with_filter(mut self, filter: Box<dyn QuestionFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Rewrite a STAR answer in concise natural English.
    ///
    /// Returns `Ok(None)` when the backend produced only whitespace - no
    /// usable output, and the caller must not treat it as success.
    pub fn rewrite(
        &self,
        answer_text: &str,
        question: Option<&str>,
    ) -> Result<Option<String>, StarError> {
        if answer_text.is_empty() {
            return Err(StarError::InvalidInput("answer text is empty".to_string()));
        }

        let prompt = prompts::rewrite_prompt(answer_text, question);
        let raw = self
            .backend
            .complete(&[ChatMessage::user(prompt)], self.max_tokens)?;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(trimmed.to_string()))
    }

    /// Generate behavioral interview questions from a job description.
    ///
    /// Raw backend output is split into lines, stripped of enumeration
    /// leftovers, and passed through the question filter.
    pub fn generate_questions(&self, source_text: &str) -> Result<Vec<String>, StarError> {
        if source_text.is_empty() {
            return Err(StarError::InvalidInput("source text is empty".to_string()));
        }

        let prompt = prompts::question_generation_prompt(source_text);
        let raw = self
            .backend
            .complete(&[ChatMessage::user(prompt)], self.max_tokens)?;

        let questions: Vec<String> = raw
            .lines()
            .map(clean_line)
            .filter(|line| self.filter.keep(line))
            .map(str::to_string)
            .collect();

        info!(count = questions.len(), "generated interview questions");
        Ok(questions)
    }
}
